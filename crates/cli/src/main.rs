//! `timegate` command-line tool.
//!
//! Checks whether an instant falls inside the configured cron windows.
//!
//! Exit codes: `0` open (or success), `1` closed, `2` configuration or usage
//! error.
//!
//! This is a CLI tool, so `println!` and `eprintln!` are intentionally used
//! for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;

use std::process::ExitCode;

use anyhow::Context;
use args::{Command, Invocation};
use timegate_domain::GateConfig;
use timegate_infra::{config, init_logging, TimeGate};

const EXIT_CLOSED: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let result = args::parse(std::env::args().skip(1)).and_then(run);

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(invocation: Invocation) -> anyhow::Result<ExitCode> {
    if invocation.command == Command::Help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&invocation)?;
    init_logging(&config.log_level, config.log_format)?;

    let gate = TimeGate::from_config(&config).context("Invalid window configuration")?;
    tracing::debug!(command = ?invocation.command, "Gate built");

    match invocation.command {
        Command::Check => Ok(run_check(&gate, &invocation)),
        Command::Validate => {
            run_validate(&gate);
            Ok(ExitCode::SUCCESS)
        }
        Command::Next => {
            run_next(&gate, &invocation);
            Ok(ExitCode::SUCCESS)
        }
        Command::Help => Ok(ExitCode::SUCCESS),
    }
}

fn load_config(invocation: &Invocation) -> anyhow::Result<GateConfig> {
    let config = match &invocation.config {
        Some(path) => config::load_from_file(Some(path.clone()))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => config::load().context("Failed to load configuration")?,
    };
    Ok(config)
}

/// Print `open`/`closed`; the exit code carries the same answer.
fn run_check(gate: &TimeGate, invocation: &Invocation) -> ExitCode {
    let window = match &invocation.at {
        Some(at) => gate.matching_window_at(at),
        None => gate.matching_window_at(&gate.now()),
    };

    match window {
        Some(index) => {
            println!("open (window {index})");
            ExitCode::SUCCESS
        }
        None => {
            println!("closed");
            ExitCode::from(EXIT_CLOSED)
        }
    }
}

fn run_validate(gate: &TimeGate) {
    let windows = gate.matcher().windows();
    println!("timezone: {}", gate.timezone());
    println!("{} window(s) valid", windows.len());
    for (index, window) in windows.iter().enumerate() {
        println!("  [{index}] {} -> {}", window.start_rule(), window.end_rule());
    }
}

fn run_next(gate: &TimeGate, invocation: &Invocation) {
    let now = match &invocation.at {
        Some(at) => at.with_timezone(&gate.timezone()),
        None => gate.now(),
    };
    println!("at {}", now.to_rfc3339());

    for (index, interval) in gate.intervals_at(&now).into_iter().enumerate() {
        match interval {
            Ok(interval) => {
                let state = if interval.contains(&now) { "open" } else { "closed" };
                println!(
                    "  [{index}] {state}: last start {}, next end {}",
                    interval.last_start.to_rfc3339(),
                    interval.next_end.to_rfc3339()
                );
            }
            Err(e) => println!("  [{index}] error: {e}"),
        }
    }
}

fn print_help() {
    println!("TimeGate - recurring cron window checks");
    println!();
    println!("USAGE:");
    println!("    timegate <COMMAND> [--config PATH] [--at RFC3339]");
    println!();
    println!("COMMANDS:");
    println!("    check     Print open/closed; exit 0 when open, 1 when closed");
    println!("    validate  Validate the configuration and list the windows");
    println!("    next      Show each window's current start and end");
    println!("    help      Show this help message");
    println!();
    println!("Without --config, TIMEGATE_ENABLE_AT / TIMEGATE_DISABLE_AT are read,");
    println!("then timegate.toml, timegate.json, timegate.cron or config.* are probed.");
}
