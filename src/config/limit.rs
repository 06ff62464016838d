//! Record limit handling
//!
//! The registry crawl is bounded by a record count. Users may also ask for an
//! unlimited crawl, written as `ALL` or `-1`.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::fmt;

/// Limit used when user input cannot be interpreted
pub const DEFAULT_RECORD_LIMIT: u32 = 5;

/// Maximum number of records a crawl may store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLimit {
    /// Follow next links until they run out
    Unlimited,
    /// Stop after this many committed records
    Max(u32),
}

impl Default for RecordLimit {
    fn default() -> Self {
        Self::Max(DEFAULT_RECORD_LIMIT)
    }
}

impl RecordLimit {
    /// Sentinel used on the command line and in TOML for "no limit"
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Parses free-form user input
    ///
    /// `ALL` (any case) and `-1` mean unlimited. Other integers are counts,
    /// with negatives meaning zero records. Non-numeric input falls back to
    /// [`DEFAULT_RECORD_LIMIT`].
    ///
    /// # Example
    ///
    /// ```
    /// use bizreg::RecordLimit;
    ///
    /// assert_eq!(RecordLimit::parse_input("all"), RecordLimit::Unlimited);
    /// assert_eq!(RecordLimit::parse_input("12"), RecordLimit::Max(12));
    /// assert_eq!(RecordLimit::parse_input("-7"), RecordLimit::Max(0));
    /// assert_eq!(RecordLimit::parse_input("lots"), RecordLimit::Max(5));
    /// ```
    pub fn parse_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case("ALL") {
            return Self::Unlimited;
        }

        match trimmed.parse::<i64>() {
            Ok(Self::UNLIMITED_SENTINEL) => Self::Unlimited,
            // Any other negative count can never be satisfied
            Ok(n) if n < 0 => Self::Max(0),
            Ok(n) => Self::Max(u32::try_from(n).unwrap_or(u32::MAX)),
            Err(_) => {
                tracing::warn!(
                    "Invalid limit '{}'. Defaulting to {}.",
                    trimmed,
                    DEFAULT_RECORD_LIMIT
                );
                Self::default()
            }
        }
    }

    /// Returns true once `count` committed records satisfy this limit
    pub fn is_reached(&self, count: u32) -> bool {
        match self {
            Self::Unlimited => false,
            Self::Max(max) => count >= *max,
        }
    }
}

impl fmt::Display for RecordLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Max(n) => write!(f, "{}", n),
        }
    }
}

impl<'de> Deserialize<'de> for RecordLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(Self::UNLIMITED_SENTINEL) => Ok(Self::Unlimited),
            Raw::Number(n) => u32::try_from(n).map(Self::Max).map_err(|_| {
                de::Error::custom(format!(
                    "record-limit must be a non-negative integer or -1, got {}",
                    n
                ))
            }),
            Raw::Text(s) if s.trim().eq_ignore_ascii_case("ALL") => Ok(Self::Unlimited),
            Raw::Text(s) => Err(de::Error::custom(format!(
                "record-limit must be an integer or \"ALL\", got \"{}\"",
                s
            ))),
        }
    }
}
