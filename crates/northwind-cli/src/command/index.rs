//! `create-index` and `await-index`.

use anyhow::Context;
use northwind_index::IndexManager;

use super::Status;
use crate::TRACING_TARGET_COMMAND;
use crate::config::{AwaitIndexArgs, CreateIndexArgs};
use crate::signal::cancel_on_ctrl_c;

pub async fn create_index(manager: &IndexManager, args: &CreateIndexArgs) -> anyhow::Result<Status> {
    let descriptor = args.index.to_descriptor();

    if args.no_wait {
        let created = manager
            .create(&descriptor)
            .await
            .with_context(|| format!("failed to create index '{}'", descriptor.name))?;

        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            index = %created.name,
            active = created.active,
            "Index submitted"
        );
        return Ok(Status::Completed);
    }

    let cancel = cancel_on_ctrl_c();
    let result = manager
        .create_and_await(&descriptor, &args.poll.to_config(), &cancel)
        .await;
    cancel.cancel();

    let (created, outcome) =
        result.with_context(|| format!("failed to create index '{}'", descriptor.name))?;
    Ok(Status::from_outcome(&created.name, outcome))
}

pub async fn await_index(manager: &IndexManager, args: &AwaitIndexArgs) -> anyhow::Result<Status> {
    let name = &args.index.name;

    let cancel = cancel_on_ctrl_c();
    let result = manager
        .poller()
        .await_active_with_cancel(name, &args.poll.to_config(), &cancel)
        .await;
    cancel.cancel();

    let outcome = result.with_context(|| format!("failed to check status of index '{name}'"))?;
    Ok(Status::from_outcome(name, outcome))
}
