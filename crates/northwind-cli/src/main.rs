#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod signal;

use std::process;

use anyhow::Context;

use crate::command::Status;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "northwind_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "northwind_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "northwind_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "northwind_cli::command";
pub const TRACING_TARGET_SIGNAL: &str = "northwind_cli::signal";

#[tokio::main]
async fn main() {
    let error = match run().await {
        Ok(status) => {
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                exit_code = status.exit_code(),
                "application terminated"
            );
            process::exit(status.exit_code());
        }
        Err(error) => error,
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<Status> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate().context("invalid configuration")?;

    command::run(cli).await
}
