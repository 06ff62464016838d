//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{AnnualReport, BusinessRecord, BusinessRow, FilingDetail};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Business not found: {0}")]
    BusinessNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Writes are append-only: the crawler never updates or deletes a row.
pub trait Storage {
    // ===== Schema =====

    /// Creates the businesses, filing_details and annual_reports tables if absent
    fn initialize(&self) -> StorageResult<()>;

    // ===== Writes =====

    /// Inserts a business and all of its children atomically
    ///
    /// The parent row is inserted first so its id can tag every child row.
    /// Either everything from `record` is committed or nothing is.
    ///
    /// # Returns
    ///
    /// The id assigned to the new business row
    fn save_business(&mut self, record: &BusinessRecord) -> StorageResult<i64>;

    // ===== Reads =====

    /// Lists all businesses in id order
    fn list_businesses(&self) -> StorageResult<Vec<BusinessRow>>;

    /// Gets a single business by id
    fn get_business(&self, business_id: i64) -> StorageResult<Option<BusinessRow>>;

    /// Gets a business's filing details in insertion order
    fn get_filing_details(&self, business_id: i64) -> StorageResult<Vec<FilingDetail>>;

    /// Gets a business's annual reports in insertion order
    fn get_annual_reports(&self, business_id: i64) -> StorageResult<Vec<AnnualReport>>;

    // ===== Statistics =====

    fn count_businesses(&self) -> StorageResult<u64>;

    fn count_filing_details(&self) -> StorageResult<u64>;

    fn count_annual_reports(&self) -> StorageResult<u64>;

    /// Counts child rows whose business_id has no matching business
    fn count_orphans(&self) -> StorageResult<u64>;
}
