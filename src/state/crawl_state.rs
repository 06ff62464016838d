/// Crawl loop state definitions
///
/// The pagination loop is a two-state machine: it is either running against a
/// URL with a count of committed records, or it has stopped for a reason.
use crate::config::RecordLimit;
use chrono::{DateTime, Utc};
use std::fmt;

/// Why a crawl stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last stored page had no "Next On List" link
    NoNextLink,

    /// The configured record limit was reached
    LimitReached,

    /// A fetch failed; carries the transport error message
    Transport(String),

    /// A record could not be committed; carries the storage error message
    Persistence(String),
}

impl StopReason {
    /// Returns true if the crawl ended because of an error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Persistence(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextLink => write!(f, "no further \"Next On List\" link"),
            Self::LimitReached => write!(f, "record limit reached"),
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Persistence(e) => write!(f, "persistence error: {}", e),
        }
    }
}

/// State of the pagination loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// About to fetch `url`; `count` records are committed so far
    Running { url: String, count: u32 },

    /// Terminal state
    Stopped { reason: StopReason, count: u32 },
}

impl CrawlState {
    /// Initial state for a crawl starting at `start_url`
    ///
    /// A zero limit stops before anything is fetched.
    pub fn start(start_url: &str, limit: RecordLimit) -> Self {
        if limit.is_reached(0) {
            return Self::Stopped {
                reason: StopReason::LimitReached,
                count: 0,
            };
        }

        Self::Running {
            url: start_url.to_string(),
            count: 0,
        }
    }

    /// Transition taken after a record has been committed
    ///
    /// Continues only when the record carried a next URL and the limit still
    /// allows another record.
    pub fn after_commit(count: u32, next_url: Option<String>, limit: RecordLimit) -> Self {
        match next_url {
            None => Self::Stopped {
                reason: StopReason::NoNextLink,
                count,
            },
            Some(_) if limit.is_reached(count) => Self::Stopped {
                reason: StopReason::LimitReached,
                count,
            },
            Some(url) => Self::Running { url, count },
        }
    }

    /// Returns the number of committed records in this state
    pub fn count(&self) -> u32 {
        match self {
            Self::Running { count, .. } | Self::Stopped { count, .. } => *count,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Final report of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records committed during this run
    pub records_saved: u32,

    /// Why the loop ended
    pub stop_reason: StopReason,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    /// Returns true if the crawl ended without an error
    pub fn is_success(&self) -> bool {
        !self.stop_reason.is_fatal()
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
