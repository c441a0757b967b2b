//! Application constants
//!
//! Centralized location for domain-level constants shared by the loader, the
//! gate and the CLI.

// Configuration defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Environment variables
pub const ENV_ENABLE_AT: &str = "TIMEGATE_ENABLE_AT";
pub const ENV_DISABLE_AT: &str = "TIMEGATE_DISABLE_AT";
pub const ENV_TIMEZONE: &str = "TIMEGATE_TIMEZONE";
pub const ENV_LOG_LEVEL: &str = "TIMEGATE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "TIMEGATE_LOG_FORMAT";

/// Separator between rules inside the `TIMEGATE_ENABLE_AT` / `TIMEGATE_DISABLE_AT` variables.
pub const ENV_RULE_SEPARATOR: char = ';';

/// Directive keyword introducing one start/end rule pair in directive files.
pub const CRON_DIRECTIVE: &str = "cron";
