//! Readiness poll arguments.

use std::time::Duration;

use clap::Args;
use northwind_index::{DEFAULT_INTERVAL, DEFAULT_MAX_WAIT, PollConfig};

/// Bounds of a readiness poll, in whole seconds.
#[derive(Debug, Clone, Copy, Args)]
pub struct PollArgs {
    /// Maximum time in seconds to wait for the index to become active.
    #[arg(long = "max-wait", default_value_t = DEFAULT_MAX_WAIT.as_secs())]
    pub max_wait: u64,

    /// Time in seconds between two status checks.
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_secs())]
    pub interval: u64,
}

impl PollArgs {
    /// Converts the arguments into a poll configuration.
    pub fn to_config(self) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(self.max_wait),
            Duration::from_secs(self.interval),
        )
    }
}
