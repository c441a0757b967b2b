//! Common utilities shared across TimeGate crates.
//!
//! # Modules
//!
//! - [`time`]: cron expression parsing and bidirectional search, plus the
//!   [`time::Clock`] abstraction used to inject "now" into hosts and tests.
//!
//! This crate has no dependencies on other TimeGate crates.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod time;

// Re-export commonly used types and traits for convenience
pub use time::{Clock, CronExpression, CronParseError, MockClock, SystemClock};
