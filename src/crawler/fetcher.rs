//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with a proper user agent string
//! - One GET per URL, no retries
//! - Classifying failures into [`TransportError`]
//! - Sleeping for the configured delay after every successful fetch

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure while fetching a page; always fatal for the current crawl
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Classifies a reqwest send error
    fn from_send(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code (always 2xx)
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use bizreg::config::UserAgentConfig;
/// use bizreg::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages one at a time with a fixed courtesy delay
pub struct PageFetcher {
    client: Client,
    delay: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Fetches a URL with a single attempt
    ///
    /// Non-2xx responses are reported as [`TransportError::Status`]. After a
    /// successful fetch this sleeps for the configured delay before returning.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, TransportError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_send(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            source: e,
        })?;

        tracing::debug!(
            "Fetched {} ({} bytes), sleeping {:?}",
            final_url,
            body.len(),
            self.delay
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}
