//! # TimeGate Domain
//!
//! Domain types and models for TimeGate.
//!
//! This crate contains:
//! - Window definitions, rule roles and resolved intervals
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other TimeGate crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod window;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use window::*;
