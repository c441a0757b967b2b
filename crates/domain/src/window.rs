//! Window data types
//!
//! A window is a half-open interval `[start, end)` whose boundaries are
//! produced by a pair of recurrence rules.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::impl_domain_label_conversions;

/// Evaluation instant: an absolute point in time with its IANA timezone.
///
/// Recurrence rules are matched against the wall-clock time of this zone.
pub type Instant = DateTime<Tz>;

/// Which boundary of a window a rule describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleRole {
    /// Rule producing the instants at which the window opens (`enable_at`).
    Start,
    /// Rule producing the instants at which the window closes (`disable_at`).
    End,
}

impl_domain_label_conversions!(RuleRole {
    Start => "start",
    End => "end",
});

/// Direction of a recurrence search relative to its reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    Previous,
    Next,
}

impl_domain_label_conversions!(SearchDirection {
    Previous => "previous",
    Next => "next",
});

/// One start/end recurrence rule pair
///
/// Immutable once constructed; both rules are guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WindowDefinition {
    start_rule: String,
    end_rule: String,
}

impl WindowDefinition {
    /// Create a definition from its two rules.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns the [`RuleRole`] of the first blank rule.
    pub fn new(start_rule: impl Into<String>, end_rule: impl Into<String>) -> Result<Self, RuleRole> {
        let start_rule = start_rule.into().trim().to_string();
        let end_rule = end_rule.into().trim().to_string();

        if start_rule.is_empty() {
            return Err(RuleRole::Start);
        }
        if end_rule.is_empty() {
            return Err(RuleRole::End);
        }

        Ok(Self { start_rule, end_rule })
    }

    /// Rule whose matches open the window.
    pub fn start_rule(&self) -> &str {
        &self.start_rule
    }

    /// Rule whose matches close the window.
    pub fn end_rule(&self) -> &str {
        &self.end_rule
    }

    /// The rule playing `role` in this window.
    pub fn rule(&self, role: RuleRole) -> &str {
        match role {
            RuleRole::Start => &self.start_rule,
            RuleRole::End => &self.end_rule,
        }
    }
}

/// Interval `[last_start, next_end)` resolved for one window at one instant
///
/// Recomputed on every query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedInterval {
    /// Latest start match at or before the query instant.
    pub last_start: Instant,
    /// First end match strictly after `last_start`.
    pub next_end: Instant,
}

impl ResolvedInterval {
    /// Start inclusive, end exclusive.
    pub fn contains(&self, now: &Instant) -> bool {
        *now == self.last_start || (*now > self.last_start && *now < self.next_end)
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.next_end.clone() - self.last_start.clone()
    }
}
