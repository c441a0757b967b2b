//! Time utilities and abstractions
//!
//! This module provides:
//! - **[`cron`]**: Cron expression parsing and evaluation, searching forwards
//!   and backwards from a reference instant in any [`chrono::TimeZone`]
//! - **[`clock`]**: Real and mock wall clocks so callers never read the
//!   system time directly
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timegate_common::time::{CronExpression, MockClock, Clock};
//!
//! let cron = CronExpression::parse("0 10 * * 1-5").unwrap();
//! let friday = Utc.with_ymd_and_hms(2024, 11, 1, 10, 30, 0).unwrap();
//!
//! let last = cron.prev_before(&friday, true).unwrap();
//! assert_eq!(last, Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap());
//!
//! let clock = MockClock::new(friday);
//! assert_eq!(clock.now(), friday);
//! ```

pub mod clock;
pub mod cron;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use cron::{CronExpression, CronParseError, SEARCH_HORIZON_YEARS};
