//! Host gate
//!
//! Couples a [`WindowSetMatcher`] with a clock and a timezone, turning "is
//! the gate open right now?" into a single call. The matcher itself never
//! reads the clock; the gate decides what "now" is.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use timegate_common::time::{Clock, SystemClock};
use timegate_core::{RecurrenceEvaluator, WindowSetMatcher};
use timegate_domain::{
    EvaluationError, GateConfig, Instant, ResolvedInterval, Result, TimeGateError,
};

use crate::evaluator::CronEvaluator;

/// Decides whether a request falls inside the configured windows
pub struct TimeGate {
    matcher: WindowSetMatcher,
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl TimeGate {
    /// Build a gate from configuration with explicit collaborators.
    ///
    /// # Errors
    /// - `TimeGateError::Config` if the timezone name is unknown
    /// - `TimeGateError::Window` if the window set is invalid
    pub fn new(
        config: &GateConfig,
        evaluator: Arc<dyn RecurrenceEvaluator>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let timezone = parse_timezone(&config.timezone)?;
        let matcher = WindowSetMatcher::from_config(config.window_set.clone(), evaluator)?;

        tracing::info!(
            timezone = %timezone,
            windows = matcher.windows().len(),
            "Time gate ready"
        );

        Ok(Self { matcher, timezone, clock })
    }

    /// Build a cron-backed gate reading the system clock.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Self::new(config, Arc::new(CronEvaluator::new()), Arc::new(SystemClock))
    }

    /// Zone that clock readings are converted to before matching.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The underlying window matcher.
    pub fn matcher(&self) -> &WindowSetMatcher {
        &self.matcher
    }

    /// Current clock reading in the gate timezone.
    pub fn now(&self) -> Instant {
        self.clock.now().with_timezone(&self.timezone)
    }

    /// Whether the gate is open at the current clock reading.
    pub fn is_open(&self) -> bool {
        self.is_open_at(&self.now())
    }

    /// Whether the gate is open at `instant`, viewed in the gate timezone.
    pub fn is_open_at<Z: TimeZone>(&self, instant: &DateTime<Z>) -> bool {
        self.matcher.matches(&self.localize(instant))
    }

    /// Index of the first window open at `instant`.
    pub fn matching_window_at<Z: TimeZone>(&self, instant: &DateTime<Z>) -> Option<usize> {
        self.matcher.matching_window(&self.localize(instant))
    }

    /// Each window's resolved interval at `instant`, in configuration order.
    pub fn intervals_at<Z: TimeZone>(
        &self,
        instant: &DateTime<Z>,
    ) -> Vec<std::result::Result<ResolvedInterval, EvaluationError>> {
        self.matcher.intervals(&self.localize(instant))
    }

    fn localize<Z: TimeZone>(&self, instant: &DateTime<Z>) -> Instant {
        instant.with_timezone(&self.timezone)
    }
}

impl fmt::Debug for TimeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeGate")
            .field("timezone", &self.timezone)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Parse an IANA timezone name.
///
/// # Errors
/// Returns `TimeGateError::Config` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| TimeGateError::Config(format!("Unknown timezone '{}': {}", name, e)))
}
