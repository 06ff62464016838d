//! Statistics generation from the registry database
//!
//! This module provides functionality for extracting and displaying
//! row counts from the storage layer.

use crate::output::traits::OutputResult;
use crate::storage::Storage;

/// Row counts across the three tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlStatistics {
    /// Rows in `businesses`
    pub businesses: u64,

    /// Rows in `filing_details`
    pub filing_details: u64,

    /// Rows in `annual_reports`
    pub annual_reports: u64,

    /// Child rows without a parent business (expected to be zero)
    pub orphans: u64,
}

impl CrawlStatistics {
    /// Average number of filing details per business
    pub fn details_per_business(&self) -> f64 {
        if self.businesses == 0 {
            0.0
        } else {
            self.filing_details as f64 / self.businesses as f64
        }
    }

    /// Average number of annual reports per business
    pub fn reports_per_business(&self) -> f64 {
        if self.businesses == 0 {
            0.0
        } else {
            self.annual_reports as f64 / self.businesses as f64
        }
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> OutputResult<CrawlStatistics> {
    Ok(CrawlStatistics {
        businesses: storage.count_businesses()?,
        filing_details: storage.count_filing_details()?,
        annual_reports: storage.count_annual_reports()?,
        orphans: storage.count_orphans()?,
    })
}

/// Formats statistics as console text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();
    out.push_str("=== Database Statistics ===\n\n");
    out.push_str(&format!("  Businesses:      {}\n", stats.businesses));
    out.push_str(&format!(
        "  Filing details:  {} ({:.1} per business)\n",
        stats.filing_details,
        stats.details_per_business()
    ));
    out.push_str(&format!(
        "  Annual reports:  {} ({:.1} per business)\n",
        stats.annual_reports,
        stats.reports_per_business()
    ));
    if stats.orphans > 0 {
        out.push_str(&format!("  Orphaned rows:   {}\n", stats.orphans));
    }
    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
