//! Cron-backed recurrence evaluator
//!
//! Adapts [`CronExpression`] to the [`RecurrenceEvaluator`] port so the
//! window matcher can be driven by standard five-field cron rules.

use timegate_common::time::{CronExpression, SEARCH_HORIZON_YEARS};
use timegate_core::RecurrenceEvaluator;
use timegate_domain::{EvaluationError, Instant, SearchDirection};

/// Evaluates window rules written as cron expressions
///
/// Stateless; rules are parsed on every call so a single evaluator can serve
/// any number of matchers and threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct CronEvaluator;

impl CronEvaluator {
    /// Create an evaluator.
    pub const fn new() -> Self {
        Self
    }

    fn parse(rule: &str) -> Result<CronExpression, EvaluationError> {
        CronExpression::parse(rule).map_err(|err| EvaluationError::InvalidRule {
            rule: rule.to_string(),
            reason: err.to_string(),
        })
    }

    fn no_match(rule: &str, direction: SearchDirection) -> EvaluationError {
        EvaluationError::NoMatch {
            rule: rule.to_string(),
            direction,
            horizon_years: SEARCH_HORIZON_YEARS,
        }
    }
}

impl RecurrenceEvaluator for CronEvaluator {
    fn validate(&self, rule: &str) -> bool {
        CronExpression::is_valid(rule)
    }

    fn previous_match_at_or_before(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError> {
        Self::parse(rule)?
            .prev_before(reference, inclusive)
            .ok_or_else(|| Self::no_match(rule, SearchDirection::Previous))
    }

    fn next_match_after(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError> {
        Self::parse(rule)?
            .next_after(reference, inclusive)
            .ok_or_else(|| Self::no_match(rule, SearchDirection::Next))
    }
}
