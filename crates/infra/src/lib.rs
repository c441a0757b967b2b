//! # TimeGate Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The cron-backed [`RecurrenceEvaluator`](timegate_core::RecurrenceEvaluator)
//! - Configuration loading (environment, TOML, JSON, directive files)
//! - The clock-driven [`TimeGate`] host
//! - Log subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `timegate-core`
//! - Depends on `timegate-common`, `timegate-domain` and `timegate-core`
//! - Contains all "impure" code (environment, files, system clock)

pub mod config;
pub mod evaluator;
pub mod gate;
pub mod observability;

// Re-export commonly used items
pub use evaluator::CronEvaluator;
pub use gate::{parse_timezone, TimeGate};
pub use observability::init_logging;
