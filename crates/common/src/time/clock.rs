//! Wall clock abstraction for testability
//!
//! Provides a trait-based approach to reading "now" so that code evaluating
//! time windows can be driven deterministically in tests without relying on
//! the actual system time.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//!
//! use timegate_common::time::{Clock, MockClock, SystemClock};
//!
//! // Use system clock in production
//! let clock = SystemClock;
//! let _now = clock.now();
//!
//! // Use mock clock in tests
//! let start = Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap();
//! let mock = MockClock::new(start);
//! mock.advance(Duration::minutes(30));
//! assert_eq!(mock.now(), Utc.with_ymd_and_hms(2024, 11, 1, 10, 30, 0).unwrap());
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Trait for reading the current wall clock time
///
/// Implementations must be cheap to call; window gates read the clock once
/// per evaluated event.
pub trait Clock: Send + Sync {
    /// Get the current wall clock time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Get milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same underlying instant, so a test can keep one handle
/// while the code under test owns another.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Advance the mock clock by `duration` (negative durations move it back).
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += duration;
    }

    /// Set the mock clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = instant;
    }
}

impl Default for MockClock {
    /// A mock clock frozen at the UNIX epoch.
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for time::clock.
    use chrono::TimeZone;

    use super::*;

    /// Validates the system clock scenario.
    ///
    /// Assertions:
    /// - Ensures `now2 >= now1` evaluates to true.
    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let now1 = clock.now();
        let now2 = clock.now();

        assert!(now2 >= now1);
    }

    /// Validates `MockClock::new` behavior for the mock clock advance scenario.
    ///
    /// Assertions:
    /// - Confirms the clock moved forward by exactly five minutes.
    #[test]
    fn test_mock_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0).unwrap();
        let clock = MockClock::new(start);

        clock.advance(Duration::minutes(5));

        assert_eq!(clock.now() - start, Duration::minutes(5));
    }

    /// Validates `MockClock::set` and that clones share state.
    ///
    /// Assertions:
    /// - Confirms a clone observes the instant set through the original.
    #[test]
    fn test_mock_clock_set_is_shared() {
        let clock = MockClock::default();
        let handle = clock.clone();
        let target = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        clock.set(target);

        assert_eq!(handle.now(), target);
        assert_eq!(handle.millis_since_epoch(), target.timestamp_millis());
    }

    /// Validates the `Arc<C>` blanket implementation.
    #[test]
    fn test_arc_clock_delegates() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(MockClock::new(start));

        assert_eq!(clock.now(), start);
    }
}
