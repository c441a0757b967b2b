//! Log subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level so operators can
//! raise verbosity (for example to see per-window `debug` evaluations)
//! without editing the gate configuration.

use timegate_domain::{LogFormat, Result, TimeGateError};
use tracing_subscriber::EnvFilter;

/// Build the event filter: `RUST_LOG` if set and valid, else `level`.
///
/// # Errors
/// Returns `TimeGateError::Config` if `level` is not a valid filter
/// directive.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level)
        .map_err(|e| TimeGateError::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber, writing to stderr.
///
/// Calling this more than once is harmless: later calls keep the first
/// subscriber and return `Ok(false)`.
///
/// # Errors
/// Returns `TimeGateError::Config` if `level` is not a valid filter
/// directive.
pub fn init_logging(level: &str, format: LogFormat) -> Result<bool> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .is_ok();

    if installed {
        tracing::debug!(level, format = %format, "Logging initialised");
    }

    Ok(installed)
}
