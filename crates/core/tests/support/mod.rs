//! Shared test helpers for `timegate-core` integration tests.
//!
//! These helpers provide a small, readable recurrence evaluator so window
//! scenarios can be written as "daily at 10:00" instead of cron syntax.

pub mod phrases;

use chrono::TimeZone;
use chrono_tz::Tz;
use timegate_domain::Instant;

/// Build a UTC instant at `year-month-day hour:minute`.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Instant {
    Tz::UTC.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}
