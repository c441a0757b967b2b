//! Window set matcher - the membership query over start/end rule pairs

use std::fmt;
use std::sync::Arc;

use timegate_domain::{
    ConfigurationError, EvaluationError, Instant, ResolvedInterval, RuleRole, WindowDefinition,
    WindowSetConfig,
};
use tracing::{debug, error, info};

use crate::ports::RecurrenceEvaluator;

/// Matches instants against an OR-ed set of recurring windows
///
/// The configuration is validated once at construction and is immutable
/// afterwards, so a matcher can be shared freely between threads. Queries
/// keep no state: every call to [`matches`](Self::matches) resolves each
/// window from scratch.
pub struct WindowSetMatcher {
    windows: Vec<WindowDefinition>,
    evaluator: Arc<dyn RecurrenceEvaluator>,
}

impl WindowSetMatcher {
    /// Create a matcher from ordered `(start_rule, end_rule)` pairs.
    ///
    /// # Errors
    /// - [`ConfigurationError::EmptySet`] if `pairs` is empty
    /// - [`ConfigurationError::MissingRule`] if a rule is blank
    /// - [`ConfigurationError::InvalidSyntax`] if the evaluator rejects a rule
    pub fn new<I, S, E>(
        pairs: I,
        evaluator: Arc<dyn RecurrenceEvaluator>,
    ) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<String>,
    {
        let mut windows = Vec::new();
        for (index, (start, end)) in pairs.into_iter().enumerate() {
            let window = WindowDefinition::new(start, end)
                .map_err(|role| ConfigurationError::MissingRule { index, role })?;

            for role in [RuleRole::Start, RuleRole::End] {
                let rule = window.rule(role);
                if !evaluator.validate(rule) {
                    return Err(ConfigurationError::InvalidSyntax {
                        index,
                        role,
                        rule: rule.to_string(),
                    });
                }
            }

            windows.push(window);
        }

        if windows.is_empty() {
            return Err(ConfigurationError::EmptySet);
        }

        for (index, window) in windows.iter().enumerate() {
            info!(
                window = index,
                start_rule = window.start_rule(),
                end_rule = window.end_rule(),
                "Window configured (OR'ed with the other windows)"
            );
        }

        Ok(Self { windows, evaluator })
    }

    /// Create a matcher from separate start and end rule lists, paired by
    /// position.
    ///
    /// # Errors
    /// - [`ConfigurationError::EmptySet`] if either list is empty
    /// - [`ConfigurationError::CardinalityMismatch`] if the lengths differ
    /// - otherwise the same errors as [`new`](Self::new)
    pub fn from_rule_lists(
        start_rules: Vec<String>,
        end_rules: Vec<String>,
        evaluator: Arc<dyn RecurrenceEvaluator>,
    ) -> Result<Self, ConfigurationError> {
        if start_rules.is_empty() || end_rules.is_empty() {
            return Err(ConfigurationError::EmptySet);
        }
        if start_rules.len() != end_rules.len() {
            return Err(ConfigurationError::CardinalityMismatch {
                starts: start_rules.len(),
                ends: end_rules.len(),
            });
        }

        Self::new(start_rules.into_iter().zip(end_rules), evaluator)
    }

    /// Create a matcher from the configuration surface.
    ///
    /// # Errors
    /// Same as [`from_rule_lists`](Self::from_rule_lists).
    pub fn from_config(
        config: WindowSetConfig,
        evaluator: Arc<dyn RecurrenceEvaluator>,
    ) -> Result<Self, ConfigurationError> {
        let (start_rules, end_rules) = config.into_rule_lists();
        Self::from_rule_lists(start_rules, end_rules, evaluator)
    }

    /// The configured windows, in configuration order.
    pub fn windows(&self) -> &[WindowDefinition] {
        &self.windows
    }

    /// Whether `now` lies inside at least one window.
    pub fn matches(&self, now: &Instant) -> bool {
        self.matching_window(now).is_some()
    }

    /// Index of the first window containing `now`.
    ///
    /// Windows are evaluated in order and evaluation stops at the first
    /// match. A window whose rules fail to evaluate is logged and treated as
    /// closed; it never prevents the remaining windows from being checked.
    pub fn matching_window(&self, now: &Instant) -> Option<usize> {
        for (index, window) in self.windows.iter().enumerate() {
            let interval = match self.resolve(window, now) {
                Ok(interval) => interval,
                Err((role, err)) => {
                    error!(
                        window = index,
                        role = %role,
                        rule = window.rule(role),
                        error = %err,
                        "Failed to compute window boundary, treating window as closed"
                    );
                    continue;
                }
            };

            debug!(
                window = index,
                start_rule = window.start_rule(),
                end_rule = window.end_rule(),
                now = %now,
                last_start = %interval.last_start,
                next_end = %interval.next_end,
                "Evaluating window"
            );

            if interval.contains(now) {
                debug!(
                    window = index,
                    now = %now,
                    last_start = %interval.last_start,
                    next_end = %interval.next_end,
                    "Instant falls inside window"
                );
                return Some(index);
            }
        }

        debug!(now = %now, "Instant did not match any window");
        None
    }

    /// Resolve every window's interval at `now`, in configuration order.
    ///
    /// Diagnostic helper; unlike [`matching_window`](Self::matching_window)
    /// it does not short-circuit and returns evaluation errors instead of
    /// logging them.
    pub fn intervals(&self, now: &Instant) -> Vec<Result<ResolvedInterval, EvaluationError>> {
        self.windows
            .iter()
            .map(|window| self.resolve(window, now).map_err(|(_, err)| err))
            .collect()
    }

    fn resolve(
        &self,
        window: &WindowDefinition,
        now: &Instant,
    ) -> Result<ResolvedInterval, (RuleRole, EvaluationError)> {
        let last_start = self
            .evaluator
            .previous_match_at_or_before(window.start_rule(), now, true)
            .map_err(|err| (RuleRole::Start, err))?;

        // Anchored at last_start so the end closes this particular opening.
        let next_end = self
            .evaluator
            .next_match_after(window.end_rule(), &last_start, false)
            .map_err(|err| (RuleRole::End, err))?;

        Ok(ResolvedInterval { last_start, next_end })
    }
}

impl fmt::Debug for WindowSetMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowSetMatcher").field("windows", &self.windows).finish_non_exhaustive()
    }
}
