//! Port interfaces for recurrence evaluation
//!
//! These traits define the boundary between the window matcher and the
//! recurrence-rule language implementation.

use timegate_domain::{EvaluationError, Instant};

/// Evaluates recurrence rules relative to a reference instant
///
/// Implementations must be stateless and pure: the same rule and reference
/// always produce the same answer, and every search is bounded.
pub trait RecurrenceEvaluator: Send + Sync {
    /// Whether `rule` is syntactically well formed. Does not evaluate it.
    fn validate(&self, rule: &str) -> bool;

    /// Latest instant satisfying `rule` that is `<= reference` (`inclusive`)
    /// or `< reference`.
    ///
    /// # Errors
    /// Returns [`EvaluationError`] if the rule cannot be evaluated or has no
    /// match within the implementation's search horizon.
    fn previous_match_at_or_before(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError>;

    /// Earliest instant satisfying `rule` that is `> reference`, or
    /// `>= reference` when `inclusive`.
    ///
    /// # Errors
    /// Same failure modes as [`Self::previous_match_at_or_before`].
    fn next_match_after(
        &self,
        rule: &str,
        reference: &Instant,
        inclusive: bool,
    ) -> Result<Instant, EvaluationError>;
}
