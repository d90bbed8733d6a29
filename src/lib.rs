//! Core library for the `fleetdesk` CLI.
//!
//! Driver records link to at most one truck and one trailer each, and
//! [`reconcile`] keeps every vehicle with at most one driver.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod fleet;
pub mod ports;
pub mod reconcile;

use clap::Parser;

pub use error::{Error, Result};

/// Run the CLI with the provided arguments.
///
/// Help and version requests are printed and count as success. Logging is
/// installed before `.env` is loaded so that step is logged too.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails, or the command's error.
pub async fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(Error::Usage(err.to_string())),
    };

    // A subscriber installed earlier in the process stays in charge.
    if let Err(err) = init_tracing(cli.quiet, cli.verbose) {
        tracing::debug!(%err, "keeping existing tracing subscriber");
    }
    config::load_dotenv();
    commands::dispatch(&cli).await
}

/// Install the `tracing` subscriber.
///
/// `FLEETDESK_LOG` overrides the level chosen by `--quiet`/`--verbose`.
///
/// # Errors
///
/// Returns [`Error::Tracing`] if a global subscriber is already set.
pub fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(config::LOG_VAR)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| Error::Tracing(error.to_string()))
}
