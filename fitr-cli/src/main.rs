//! Binary crate for the `fitr` command-line tool.
//!
//! This crate focuses on:
//! - Hosting the two handlers locally (JSON in, JSON out)
//! - Interactive configuration of the OpenWeather API key
//! - Logging setup

use std::process::ExitCode;

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();

    if let Err(err) = init_tracing(cmd.verbose) {
        eprintln!("{err:#}");
    }

    match cmd.run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Logs go to stderr so stdout only ever carries JSON.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
