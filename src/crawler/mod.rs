//! Crawler module for fetching and extracting registry detail pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed courtesy delay
//! - Structural selector rules for text fields
//! - Record and next-link extraction
//! - The sequential pagination loop

mod coordinator;
mod extractor;
mod fetcher;
pub mod selectors;

pub use coordinator::{run_crawl, Crawler};
pub use extractor::{
    extract_annual_reports, extract_filing_details, extract_next_url, extract_page,
    extract_record, status_from, ExtractedPage, STATUS_LABEL,
};
pub use fetcher::{build_http_client, FetchedPage, PageFetcher, TransportError};
pub use selectors::{first_match, TextRule, ADDRESS_RULES, NAME_RULES};

pub use crate::storage::BusinessRecord;
