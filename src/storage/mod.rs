//! Storage module for persisting registry records
//!
//! This module owns the normalized three-table schema:
//! - `businesses`: one row per visited detail page
//! - `filing_details`: label/value pairs belonging to a business
//! - `annual_reports`: (year, filed date) rows belonging to a business
//!
//! A business and its children are always written together through
//! [`Storage::save_business`], inside one transaction.

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

/// Placeholder stored for fields the extractor could not find
pub const NOT_AVAILABLE: &str = "N/A";

/// One labeled filing attribute, e.g. ("Status", "ACTIVE")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingDetail {
    pub label: String,
    pub value: String,
}

impl FilingDetail {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One row of a business's annual report history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualReport {
    pub year: String,
    pub filed_date: String,
}

impl AnnualReport {
    pub fn new(year: impl Into<String>, filed_date: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            filed_date: filed_date.into(),
        }
    }
}

/// A business together with its children, written as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub name: String,
    pub status: String,
    pub principal_address: String,
    /// Filing attributes in document order; duplicate labels are kept
    pub filing_details: Vec<FilingDetail>,
    /// Annual report rows in table order, header excluded
    pub annual_reports: Vec<AnnualReport>,
}

impl Default for BusinessRecord {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            status: NOT_AVAILABLE.to_string(),
            principal_address: NOT_AVAILABLE.to_string(),
            filing_details: Vec::new(),
            annual_reports: Vec::new(),
        }
    }
}

/// A row of the `businesses` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub principal_address: String,
}
