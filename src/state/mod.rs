//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the pagination loop's Running/Stopped state machine
//! - `StopReason`: why a crawl ended (natural end or fatal error)
//! - `CrawlOutcome`: the final report handed back to callers

mod crawl_state;

pub use crawl_state::{CrawlOutcome, CrawlState, StopReason};
