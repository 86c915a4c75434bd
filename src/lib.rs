//! Core library entry for the `portal` CLI.
//!
//! The heart of the crate is [`guidance`]: it turns a project's task groups
//! and tasks into one ordered sequence and a [`guidance::GuidanceContext`]
//! describing where the client stands. Everything external sits behind the
//! traits in [`ports`].

pub mod adapters;
pub mod assistant;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod domain;
pub mod guidance;
pub mod ports;
pub mod telemetry;
pub mod weekly;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// `--help` and `--version` print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| format!("Failed to print help: {e}"));
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
