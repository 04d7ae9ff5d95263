//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── store: ReqwestConfig   # Endpoint, secret, timeout, headers
//! └── command: Command
//!     ├── create-index       # IndexArgs + PollArgs
//!     ├── await-index        # PollArgs
//!     ├── paginate           # PageArgs
//!     └── demo               # PollArgs + PageArgs
//! ```
//!
//! All store options can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! northwind --store-secret "$SECRET" await-index --name categories_all
//!
//! STORE_SECRET="$SECRET" northwind paginate --name categories_all --page-size 8
//! ```

mod command;
mod poll;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use command::{AwaitIndexArgs, Command, CreateIndexArgs, DemoArgs, PageArgs};
use northwind_reqwest::ReqwestConfig;
pub use poll::PollArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "northwind")]
#[command(about = "Create, await and page through document store indexes")]
#[command(version)]
pub struct Cli {
    /// Store connection configuration.
    #[clap(flatten)]
    pub store: ReqwestConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.store
            .validate()
            .context("invalid store configuration")?;
        self.command.validate()
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            endpoint = %self.store.store_endpoint,
            timeout_secs = self.store.store_timeout,
            api_version = %self.store.api_version,
            command = self.command.name(),
            "Store configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
