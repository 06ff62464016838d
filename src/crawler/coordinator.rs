//! Crawler coordinator - the pagination loop
//!
//! This module drives the crawl one page at a time:
//! - Fetch the current URL
//! - Extract the record and the "Next On List" link
//! - Commit the record and its children in one transaction
//! - Decide whether to follow the link
//!
//! Any transport or persistence failure stops the loop. Records committed
//! before the failure stay in the database and are reported in the outcome.

use crate::config::{Config, RecordLimit};
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{build_http_client, PageFetcher};
use crate::state::{CrawlOutcome, CrawlState, StopReason};
use crate::storage::{SqliteStorage, Storage};
use crate::BizregError;
use chrono::Utc;
use std::path::Path;
use std::time::Duration;

/// Main crawler structure
///
/// Owns the HTTP client and the database connection for one run. Both are
/// released when [`Crawler::run`] returns, on every exit path.
pub struct Crawler {
    fetcher: PageFetcher,
    storage: SqliteStorage,
    start_url: String,
    base_origin: String,
    limit: RecordLimit,
}

impl Crawler {
    /// Creates a crawler from configuration
    ///
    /// Opens the database at `config.output.database_path` and creates the
    /// schema if it is missing.
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(BizregError)` - The database or HTTP client could not be set up
    pub fn new(config: Config) -> Result<Self, BizregError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        Self::with_storage(config, storage)
    }

    /// Creates a crawler around an already opened store
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Result<Self, BizregError> {
        storage.initialize()?;

        let client = build_http_client(&config.user_agent)?;
        let fetcher = PageFetcher::new(
            client,
            Duration::from_millis(config.crawler.request_delay),
        );

        Ok(Self {
            fetcher,
            storage,
            start_url: config.crawler.start_url,
            base_origin: config.crawler.base_origin,
            limit: config.crawler.record_limit,
        })
    }

    /// Runs the pagination loop to completion
    ///
    /// Consumes the crawler so the connection and client are closed once the
    /// outcome is returned.
    pub async fn run(mut self) -> CrawlOutcome {
        let started_at = Utc::now();
        tracing::info!("Starting crawl at {} (limit: {})", self.start_url, self.limit);

        let mut state = CrawlState::start(&self.start_url, self.limit);

        let (reason, count) = loop {
            match state {
                CrawlState::Running { url, count } => state = self.step(url, count).await,
                CrawlState::Stopped { reason, count } => break (reason, count),
            }
        };

        if reason.is_fatal() {
            tracing::error!("Crawl stopped after {} records: {}", count, reason);
        } else {
            tracing::info!("Crawl finished with {} records: {}", count, reason);
        }

        CrawlOutcome {
            records_saved: count,
            stop_reason: reason,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Processes one page and returns the next state
    async fn step(&mut self, url: String, count: u32) -> CrawlState {
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                return CrawlState::Stopped {
                    reason: StopReason::Transport(e.to_string()),
                    count,
                }
            }
        };

        let extracted = extract_page(&page.body, &self.base_origin);

        let business_id = match self.storage.save_business(&extracted.record) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Failed to save record from {}: {}", url, e);
                return CrawlState::Stopped {
                    reason: StopReason::Persistence(e.to_string()),
                    count,
                };
            }
        };

        let count = count + 1;
        tracing::info!(
            "Saved business {} '{}' ({} filing details, {} annual reports) [{}]",
            business_id,
            extracted.record.name,
            extracted.record.filing_details.len(),
            extracted.record.annual_reports.len(),
            count
        );

        CrawlState::after_commit(count, extracted.next_url, self.limit)
    }
}

/// Runs a complete crawl from configuration
///
/// # Example
///
/// ```no_run
/// use bizreg::config::load_config;
/// use bizreg::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("bizreg.toml"))?;
/// let outcome = run_crawl(config).await?;
/// println!("Saved {} records", outcome.records_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, BizregError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run().await)
}
