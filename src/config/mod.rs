//! Configuration module for bizreg
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use bizreg::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bizreg.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.start_url);
//! ```

mod limit;
mod parser;
mod types;
mod validation;

pub use limit::{RecordLimit, DEFAULT_RECORD_LIMIT};
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_BASE_ORIGIN,
    DEFAULT_DATABASE_PATH, DEFAULT_REQUEST_DELAY_MS, DEFAULT_SUMMARY_PATH,
};
pub use validation::validate;
