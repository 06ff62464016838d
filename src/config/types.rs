use crate::config::limit::RecordLimit;
use serde::Deserialize;

/// Default registry origin prepended to path-only "Next On List" links
pub const DEFAULT_BASE_ORIGIN: &str = "https://search.sunbiz.org";

/// Default delay after each successful fetch (milliseconds)
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Default database file name
pub const DEFAULT_DATABASE_PATH: &str = "sunbiz_normalized.db";

/// Default markdown summary file name
pub const DEFAULT_SUMMARY_PATH: &str = "sunbiz_summary.md";

/// Main configuration structure for bizreg
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First detail page to visit
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of records to store, or unlimited
    #[serde(rename = "record-limit", default)]
    pub record_limit: RecordLimit,

    /// Time to wait after each successful fetch (milliseconds)
    #[serde(rename = "request-delay", default = "default_request_delay")]
    pub request_delay: u64,

    /// Origin that path-only next links are appended to
    #[serde(rename = "base-origin", default = "default_base_origin")]
    pub base_origin: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "bizreg".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            summary_path: DEFAULT_SUMMARY_PATH.to_string(),
        }
    }
}

impl Config {
    /// Builds a configuration from a start URL with every other option defaulted
    pub fn with_start_url(start_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                start_url: start_url.into(),
                record_limit: RecordLimit::default(),
                request_delay: DEFAULT_REQUEST_DELAY_MS,
                base_origin: DEFAULT_BASE_ORIGIN.to_string(),
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_request_delay() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_base_origin() -> String {
    DEFAULT_BASE_ORIGIN.to_string()
}

fn default_summary_path() -> String {
    DEFAULT_SUMMARY_PATH.to_string()
}
