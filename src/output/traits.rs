//! Output types shared by the report writers

use crate::storage::{AnnualReport, BusinessRow, FilingDetail, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A stored business joined with its child rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessSummary {
    pub business: BusinessRow,
    pub filing_details: Vec<FilingDetail>,
    pub annual_reports: Vec<AnnualReport>,
}
