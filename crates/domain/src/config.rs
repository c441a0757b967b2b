//! Configuration structures
//!
//! Deserialized from TOML, JSON or environment variables by the infra
//! loader. Windows can be written pre-paired:
//!
//! ```toml
//! timezone = "Europe/Berlin"
//!
//! [[windows]]
//! start = "45 22 * * 1-5"
//! end = "15 23 * * 1-5"
//! ```
//!
//! or as two parallel lists (`enable_at` / `disable_at`), which must have the
//! same length.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_TIMEZONE};
use crate::impl_domain_label_conversions;

/// One start/end rule pair as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRuleConfig {
    #[serde(alias = "enable_at")]
    pub start: String,
    #[serde(alias = "disable_at")]
    pub end: String,
}

/// The window set as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSetConfig {
    /// Pre-paired windows.
    pub windows: Vec<WindowRuleConfig>,
    /// Start rules, paired by position with `disable_at`.
    pub enable_at: Vec<String>,
    /// End rules, paired by position with `enable_at`.
    pub disable_at: Vec<String>,
}

impl WindowSetConfig {
    /// Build a config from already paired rules.
    pub fn from_pairs<I, S, E>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<String>,
    {
        Self {
            windows: pairs
                .into_iter()
                .map(|(start, end)| WindowRuleConfig { start: start.into(), end: end.into() })
                .collect(),
            ..Self::default()
        }
    }

    /// Flatten into parallel start/end lists: paired windows first, then the
    /// split `enable_at` / `disable_at` lists.
    pub fn into_rule_lists(self) -> (Vec<String>, Vec<String>) {
        let (mut starts, mut ends): (Vec<String>, Vec<String>) =
            self.windows.into_iter().map(|window| (window.start, window.end)).unzip();
        starts.extend(self.enable_at);
        ends.extend(self.disable_at);
        (starts, ends)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.enable_at.is_empty() && self.disable_at.is_empty()
    }
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl_domain_label_conversions!(LogFormat {
    Pretty => "pretty",
    Compact => "compact",
    Json => "json",
});

/// Host-side gate configuration
///
/// `timezone` only controls how the host turns the current time into an
/// evaluation instant; the window matcher itself takes no options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(flatten)]
    pub window_set: WindowSetConfig,
}

impl GateConfig {
    pub fn new(window_set: WindowSetConfig) -> Self {
        Self {
            timezone: default_timezone(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            window_set,
        }
    }
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
