//! Configuration loader
//!
//! Loads the gate configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a window variable is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports TOML, JSON and directive (`.cron` / `.conf`) formats
//!
//! ## Environment Variables
//! - `TIMEGATE_ENABLE_AT`: `;`-separated start rules (required)
//! - `TIMEGATE_DISABLE_AT`: `;`-separated end rules, paired by position
//!   (required)
//! - `TIMEGATE_TIMEZONE`: IANA timezone name (default `UTC`)
//! - `TIMEGATE_LOG_LEVEL`: log filter directive (default `info`)
//! - `TIMEGATE_LOG_FORMAT`: `pretty`, `compact` or `json` (default `pretty`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./timegate.{toml,json,cron}` (current working directory)
//! 2. `./config.{toml,json}` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use timegate_domain::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_TIMEZONE, ENV_DISABLE_AT, ENV_ENABLE_AT, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_RULE_SEPARATOR, ENV_TIMEZONE,
};
use timegate_domain::{GateConfig, LogFormat, Result, TimeGateError, WindowSetConfig};

use super::directive::parse_directives;

/// File names probed in each candidate directory, in priority order.
const CONFIG_FILE_NAMES: [&str; 5] =
    ["timegate.toml", "timegate.json", "timegate.cron", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the window
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TimeGateError::Config` if:
/// - The window variables are set but another variable is invalid
/// - No config file is found when falling back
/// - File format is invalid
pub fn load() -> Result<GateConfig> {
    let missing: Vec<&str> = [ENV_ENABLE_AT, ENV_DISABLE_AT]
        .into_iter()
        .filter(|key| std::env::var_os(key).is_none())
        .collect();

    if !missing.is_empty() {
        tracing::debug!(?missing, "Window variables not set, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// `TIMEGATE_ENABLE_AT` and `TIMEGATE_DISABLE_AT` must both be present.
/// Empty list entries (for example a trailing `;`) are ignored.
///
/// # Errors
/// Returns `TimeGateError::Config` if a window variable is missing or the
/// log format is not recognised.
pub fn load_from_env() -> Result<GateConfig> {
    let enable_at = split_rules(&env_var(ENV_ENABLE_AT)?);
    let disable_at = split_rules(&env_var(ENV_DISABLE_AT)?);

    let log_format = match std::env::var(ENV_LOG_FORMAT) {
        Ok(value) => value.parse::<LogFormat>().map_err(TimeGateError::Config)?,
        Err(_) => LogFormat::default(),
    };

    Ok(GateConfig {
        timezone: env_var_or(ENV_TIMEZONE, DEFAULT_TIMEZONE),
        log_level: env_var_or(ENV_LOG_LEVEL, DEFAULT_LOG_LEVEL),
        log_format,
        window_set: WindowSetConfig { enable_at, disable_at, ..WindowSetConfig::default() },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// The format is detected by file extension.
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `TimeGateError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
///
/// Returns `TimeGateError::Io` if the file exists but cannot be read.
pub fn load_from_file(path: Option<PathBuf>) -> Result<GateConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TimeGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TimeGateError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        TimeGateError::Io(format!("Failed to read {}: {}", config_path.display(), e))
    })?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension: `.toml`, `.json`, or `.cron` /
/// `.conf` for the directive format. Files without an extension are read
/// as TOML.
///
/// # Errors
/// Returns `TimeGateError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<GateConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TimeGateError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TimeGateError::Config(format!("Invalid JSON format: {}", e))),
        "cron" | "conf" => Ok(parse_directives(contents)?),
        _ => Err(TimeGateError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same relative locations next to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

fn split_rules(value: &str) -> Vec<String> {
    value
        .split(ENV_RULE_SEPARATOR)
        .map(str::trim)
        .filter(|rule| !rule.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `TimeGateError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TimeGateError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Get optional environment variable, falling back to `default` when unset
/// or blank.
fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 5] =
        [ENV_ENABLE_AT, ENV_DISABLE_AT, ENV_TIMEZONE, ENV_LOG_LEVEL, ENV_LOG_FORMAT];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(extension: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(&format!(".{extension}")).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_split_rules() {
        assert_eq!(
            split_rules("0 10 * * 1-5; 0 15 * * 0,6 ;"),
            vec!["0 10 * * 1-5".to_string(), "0 15 * * 0,6".to_string()]
        );
        assert!(split_rules(" ; ").is_empty());
    }

    #[test]
    fn test_env_var_or_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TIMEGATE_TEST_OPTIONAL", "  Europe/Paris ");
        assert_eq!(env_var_or("TIMEGATE_TEST_OPTIONAL", "UTC"), "Europe/Paris");

        std::env::set_var("TIMEGATE_TEST_OPTIONAL", "   ");
        assert_eq!(env_var_or("TIMEGATE_TEST_OPTIONAL", "UTC"), "UTC");

        std::env::remove_var("TIMEGATE_TEST_OPTIONAL");
        assert_eq!(env_var_or("TIMEGATE_TEST_OPTIONAL", "UTC"), "UTC");
    }

    /// Validates loading a complete configuration from the environment.
    ///
    /// Assertions:
    /// - rule lists are split on `;` and paired by position
    /// - optional settings are read when present
    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "0 10 * * 1-5;0 15 * * 0,6");
        std::env::set_var(ENV_DISABLE_AT, "0 11 * * 1-5;0 16 * * 0,6");
        std::env::set_var(ENV_TIMEZONE, "America/New_York");
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        std::env::set_var(ENV_LOG_FORMAT, "json");

        let result = load_from_env();
        clear_env();

        let config = result.expect("should load config from env vars");
        assert_eq!(config.window_set.enable_at, vec!["0 10 * * 1-5", "0 15 * * 0,6"]);
        assert_eq!(config.window_set.disable_at, vec!["0 11 * * 1-5", "0 16 * * 0,6"]);
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "@daily");
        std::env::set_var(ENV_DISABLE_AT, "@hourly");

        let result = load_from_env();
        clear_env();

        let config = result.expect("should load config from env vars");
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "0 10 * * *");

        let result = load_from_env();
        clear_env();

        let err = result.expect_err("should fail with missing disable list");
        assert_eq!(
            err,
            TimeGateError::Config(format!("Missing required environment variable: {ENV_DISABLE_AT}"))
        );
    }

    #[test]
    fn test_load_from_env_invalid_log_format() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "0 10 * * *");
        std::env::set_var(ENV_DISABLE_AT, "0 11 * * *");
        std::env::set_var(ENV_LOG_FORMAT, "xml");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(TimeGateError::Config(_))), "should be a Config error");
    }

    /// A typo in an optional variable must not silently switch to a file.
    #[test]
    fn test_load_reports_env_errors_when_rules_are_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "0 10 * * *");
        std::env::set_var(ENV_DISABLE_AT, "0 11 * * *");
        std::env::set_var(ENV_LOG_FORMAT, "jsno");

        let result = load();
        clear_env();

        assert!(
            matches!(&result, Err(TimeGateError::Config(msg)) if msg.contains("jsno")),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn test_load_from_file_json() {
        let file = temp_config(
            "json",
            r#"{
                "timezone": "Asia/Tokyo",
                "windows": [
                    { "start": "0 10 * * 1-5", "end": "0 11 * * 1-5" }
                ]
            }"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.timezone, "Asia/Tokyo");
        assert_eq!(config.window_set.windows.len(), 1);
        assert_eq!(config.window_set.windows[0].end, "0 11 * * 1-5");
    }

    #[test]
    fn test_load_from_file_toml_split_lists() {
        let file = temp_config(
            "toml",
            r#"
log_level = "warn"
enable_at = ["0 10 * * 1-5", "0 15 * * 0,6"]
disable_at = ["0 11 * * 1-5", "0 16 * * 0,6"]
"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.window_set.enable_at.len(), 2);
        assert!(config.window_set.windows.is_empty());
    }

    #[test]
    fn test_load_from_file_directives() {
        let file = temp_config("cron", "cron \"0 10 * * 1-5\" \"0 11 * * 1-5\"\n");

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.window_set.windows.len(), 1);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/timegate.toml")));
        assert!(matches!(result, Err(TimeGateError::Config(_))), "should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let file = temp_config("json", r#"{ "this is": "not valid json" "#);

        let result = load_from_file(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(TimeGateError::Config(msg)) if msg.starts_with("Invalid JSON")));
    }

    #[test]
    fn test_load_from_file_directive_error_keeps_line_number() {
        let file = temp_config("conf", "timezone UTC\ncron \"@daily\"\n");

        let result = load_from_file(Some(file.path().to_path_buf()));
        assert_eq!(
            result,
            Err(TimeGateError::Config("line 2: 'cron' expects 2 argument(s), got 1".to_string()))
        );
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("timegate.yaml"));
        assert_eq!(
            result,
            Err(TimeGateError::Config("Unsupported config format: yaml".to_string()))
        );
    }

    #[test]
    fn test_parse_config_without_extension_is_toml() {
        let config =
            parse_config("[[windows]]\nstart = \"@daily\"\nend = \"@hourly\"\n", Path::new("gate"))
                .unwrap();
        assert_eq!(config.window_set.windows.len(), 1);
    }

    #[test]
    fn test_load_prefers_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ENABLE_AT, "0 9 * * *");
        std::env::set_var(ENV_DISABLE_AT, "0 17 * * *");

        let result = load();
        clear_env();

        let config = result.expect("env config should win");
        assert_eq!(config.window_set.enable_at, vec!["0 9 * * *"]);
    }
}
