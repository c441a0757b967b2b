//! Configuration loading and management
//!
//! This module provides utilities for loading the gate configuration
//! from environment variables and files.

pub mod directive;
pub mod loader;

// Re-export commonly used items
pub use directive::{parse_directives, DirectiveError};
pub use loader::{load, load_from_env, load_from_file, parse_config, probe_config_paths};
