//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::window::{RuleRole, SearchDirection};

/// Main error type for TimeGate
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TimeGateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Window configuration error: {0}")]
    Window(#[from] ConfigurationError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TimeGate operations
pub type Result<T> = std::result::Result<T, TimeGateError>;

/// Invalid window set configuration, fatal at construction
///
/// Pair indexes are zero-based, in configuration order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigurationError {
    #[error("window set must contain at least one start/end rule pair")]
    EmptySet,

    #[error("window pair {index} is missing its {role} rule")]
    MissingRule { index: usize, role: RuleRole },

    #[error("got {starts} start rules but {ends} end rules; every start rule needs an end rule")]
    CardinalityMismatch { starts: usize, ends: usize },

    #[error("invalid {role} rule at pair {index}: '{rule}'")]
    InvalidSyntax { index: usize, role: RuleRole, rule: String },
}

/// A recurrence rule could not be evaluated at query time
///
/// Recovered per window pair; never escapes a membership query.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EvaluationError {
    #[error("rule '{rule}' cannot be evaluated: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("rule '{rule}' has no {direction} match within {horizon_years} years")]
    NoMatch { rule: String, direction: SearchDirection, horizon_years: i32 },
}
