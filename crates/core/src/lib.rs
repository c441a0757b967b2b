//! # TimeGate Core
//!
//! Pure window-matching logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The [`RecurrenceEvaluator`] port through which recurrence rules are
//!   evaluated
//! - The [`WindowSetMatcher`], which answers "is this instant inside any
//!   configured window"
//!
//! ## Architecture Principles
//! - Only depends on `timegate-domain`
//! - No cron parsing, configuration files or clocks
//! - All external collaborators via traits
//! - Pure, testable logic: the evaluation instant is always a parameter

pub mod ports;
pub mod window;

// Re-export specific items to avoid ambiguity
pub use ports::RecurrenceEvaluator;
pub use window::WindowSetMatcher;
