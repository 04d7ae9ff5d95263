//! Subcommand handlers.

mod demo;
mod index;
mod paginate;

use anyhow::Context;
use northwind_index::{IndexManager, PollOutcome};
use northwind_reqwest::ReqwestClient;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{Cli, Command};
use crate::signal::cancel_on_ctrl_c;

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything the command set out to do happened.
    Completed,
    /// An awaited index did not become active.
    NotActive,
}

impl Status {
    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::NotActive => 2,
        }
    }

    fn from_outcome(index_name: &str, outcome: PollOutcome) -> Self {
        match outcome {
            PollOutcome::Active => {
                tracing::info!(
                    target: TRACING_TARGET_COMMAND,
                    index = %index_name,
                    "Index is ready"
                );
                Self::Completed
            }
            PollOutcome::TimedOut | PollOutcome::Cancelled => {
                tracing::warn!(
                    target: TRACING_TARGET_COMMAND,
                    index = %index_name,
                    outcome = %outcome,
                    "Index is not active yet"
                );
                Self::NotActive
            }
        }
    }
}

/// Runs the parsed subcommand against the configured store.
pub async fn run(cli: Cli) -> anyhow::Result<Status> {
    let client = ReqwestClient::new(cli.store).context("failed to create store client")?;
    let manager = IndexManager::new(client.clone().into_service());

    match cli.command {
        Command::CreateIndex(args) => index::create_index(&manager, &args).await,
        Command::AwaitIndex(args) => index::await_index(&manager, &args).await,
        Command::Paginate(args) => {
            let cancel = cancel_on_ctrl_c();
            let result = paginate::paginate(&manager, &args.name, args.page, &cancel).await;
            cancel.cancel();
            result?;
            Ok(Status::Completed)
        }
        Command::Demo(args) => demo::demo(&client, &manager, &args).await,
    }
}
