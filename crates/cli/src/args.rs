//! Command-line argument parsing

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, FixedOffset};

/// Subcommand selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Check,
    Validate,
    Next,
    Help,
}

/// Parsed invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub config: Option<PathBuf>,
    pub at: Option<DateTime<FixedOffset>>,
}

/// Parse `args` (without the program name).
///
/// # Errors
/// Fails on unknown commands or flags, missing flag values, and `--at`
/// values that are not RFC 3339 timestamps.
pub fn parse<I>(args: I) -> anyhow::Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let command = match args.next().as_deref() {
        Some("check") => Command::Check,
        Some("validate") => Command::Validate,
        Some("next") => Command::Next,
        Some("help" | "--help" | "-h") | None => Command::Help,
        Some(unknown) => bail!("Unknown command: {unknown}"),
    };

    let mut invocation = Invocation { command, config: None, at: None };

    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| anyhow!("Missing value for {flag}"));
        match flag.as_str() {
            "--config" | "-c" => invocation.config = Some(PathBuf::from(value()?)),
            "--at" => {
                let raw = value()?;
                let at = DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("Invalid --at timestamp '{raw}' (expected RFC 3339)"))?;
                invocation.at = Some(at);
            }
            _ => bail!("Unknown option: {flag}"),
        }
    }

    Ok(invocation)
}
