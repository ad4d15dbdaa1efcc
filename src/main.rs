//! gmsd: coordination layer for multiple agents sharing one planning workspace.
//!
//! This is the main entry point for the `gmsd` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod gates;
pub mod ownership;
pub mod state;
pub mod touches;

#[cfg(test)]
mod test_support;

use cli::Cli;
use error::GmsdError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `--log-level`.
const LOG_ENV_VAR: &str = "GMSD_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            match &err {
                // Block reasons are read by the worker; print them verbatim.
                GmsdError::Blocked(message) => eprintln!("{}", message),
                _ => eprintln!("Error: {}", err),
            }

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Install a compact stderr subscriber. Stdout stays reserved for command output.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
