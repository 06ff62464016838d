//! Output module for reading back stored registry records
//!
//! This module handles:
//! - Row-count statistics
//! - The console listing and per-business detail view
//! - Markdown export of every business

mod markdown;
pub mod report;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use report::{format_detail, format_listing, truncate};
pub use stats::{format_statistics, load_statistics, print_statistics, CrawlStatistics};
pub use traits::{BusinessSummary, OutputError, OutputResult};

use crate::storage::{Storage, StorageError};

/// Loads one business with its filing details and annual reports
///
/// # Returns
///
/// * `Ok(BusinessSummary)` - The business and its children
/// * `Err(OutputError::Storage(StorageError::BusinessNotFound))` - No such id
pub fn load_business(storage: &dyn Storage, business_id: i64) -> OutputResult<BusinessSummary> {
    let business = storage
        .get_business(business_id)?
        .ok_or(StorageError::BusinessNotFound(business_id))?;

    Ok(BusinessSummary {
        filing_details: storage.get_filing_details(business.id)?,
        annual_reports: storage.get_annual_reports(business.id)?,
        business,
    })
}

/// Loads every business with its children, in id order
pub fn load_all_businesses(storage: &dyn Storage) -> OutputResult<Vec<BusinessSummary>> {
    storage
        .list_businesses()?
        .into_iter()
        .map(|business| {
            Ok(BusinessSummary {
                filing_details: storage.get_filing_details(business.id)?,
                annual_reports: storage.get_annual_reports(business.id)?,
                business,
            })
        })
        .collect()
}
