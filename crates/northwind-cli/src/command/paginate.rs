//! `paginate`.

use std::ops::ControlFlow;

use anyhow::Context;
use northwind_index::{Continuation, IndexManager, Page, WalkSummary};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_COMMAND;
use crate::config::PageArgs;

/// Walks `index_name`, logging every page and its continuation cursor.
///
/// No page is requested once `cancel` has fired.
pub async fn paginate(
    manager: &IndexManager,
    index_name: &str,
    args: PageArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<WalkSummary> {
    let walker = manager
        .walker(index_name, args.page_size)
        .context("invalid pagination arguments")?
        .with_projection(args.projection());

    if cancel.is_cancelled() {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            index = %index_name,
            "Pagination cancelled before the first page"
        );
        return Ok(WalkSummary::default());
    }

    let mut page_number = 0_usize;
    let summary = walker
        .for_each_page(|page: Page<Value>| {
            page_number += 1;
            log_page(index_name, page_number, &page);
            if cancel.is_cancelled() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await
        .with_context(|| format!("failed to page through index '{index_name}'"))?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        index = %index_name,
        pages = summary.pages,
        records = summary.records,
        completed = summary.completed,
        "Pagination finished"
    );

    Ok(summary)
}

fn log_page(index_name: &str, page_number: usize, page: &Page<Value>) {
    match serde_json::to_string_pretty(page.records()) {
        Ok(records) => tracing::info!(
            target: TRACING_TARGET_COMMAND,
            index = %index_name,
            page = page_number,
            records = page.len(),
            "Page results:\n{records}"
        ),
        Err(err) => tracing::warn!(
            target: TRACING_TARGET_COMMAND,
            index = %index_name,
            page = page_number,
            error = %err,
            "Failed to render page"
        ),
    }

    if let Continuation::After(cursor) = page.continuation() {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            index = %index_name,
            page = page_number,
            cursor = %cursor,
            "Next page starts after cursor"
        );
    }
}
