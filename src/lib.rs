//! Bizreg: a sequential business-registry crawler
//!
//! This crate follows a registry's "Next On List" links one detail page at a
//! time, extracts each business record with fixed structural selectors, and
//! stores it into a normalized three-table SQLite schema.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

pub use crawler::TransportError;
pub use storage::StorageError;

/// Main error type for bizreg operations
#[derive(Debug, Error)]
pub enum BizregError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for bizreg operations
pub type Result<T> = std::result::Result<T, BizregError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, RecordLimit};
pub use crawler::{run_crawl, BusinessRecord, Crawler};
pub use state::{CrawlOutcome, CrawlState, StopReason};
