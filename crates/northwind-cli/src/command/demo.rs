//! `demo`: builds the category indexes, then walks `categories_all`.

use anyhow::Context;
use northwind_core::QueryClient;
use northwind_index::{FieldPath, IndexDescriptor, IndexManager};
use northwind_reqwest::ReqwestClient;

use super::Status;
use super::paginate::paginate;
use crate::TRACING_TARGET_COMMAND;
use crate::config::DemoArgs;
use crate::signal::cancel_on_ctrl_c;

/// Values-only index over every category, created with the sample data.
const CATEGORIES_ALL: &str = "categories_all";

fn demo_indexes() -> anyhow::Result<Vec<IndexDescriptor>> {
    let category_by_id = IndexDescriptor::new("category_by_id", "categories")
        .with_terms([path("data.name")?])
        .with_values([path("data.categoryID")?]);
    let products_by_category_id = IndexDescriptor::new("products_by_category_id", "products")
        .with_terms([path("data.categoryID")?]);

    Ok(vec![category_by_id, products_by_category_id])
}

fn path(s: &str) -> anyhow::Result<FieldPath> {
    s.parse().with_context(|| format!("invalid field path '{s}'"))
}

pub async fn demo(
    client: &ReqwestClient,
    manager: &IndexManager,
    args: &DemoArgs,
) -> anyhow::Result<Status> {
    let health = client.health_check().await?;
    if !health.is_healthy() {
        tracing::warn!(
            target: TRACING_TARGET_COMMAND,
            status = ?health.status,
            detail = ?health.detail,
            "Store did not answer the health check"
        );
    } else {
        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            latency_ms = health.latency.map(|d| d.as_millis()),
            "Connected to store"
        );
    }

    let config = args.poll.to_config();
    let cancel = cancel_on_ctrl_c();
    let mut status = Status::Completed;

    for descriptor in demo_indexes()? {
        let result = manager.create_and_await(&descriptor, &config, &cancel).await;
        let (created, outcome) =
            result.with_context(|| format!("failed to create index '{}'", descriptor.name))?;

        if Status::from_outcome(&created.name, outcome) == Status::NotActive {
            status = Status::NotActive;
        }
        if cancel.is_cancelled() {
            return Ok(Status::NotActive);
        }
    }

    let result = paginate(manager, CATEGORIES_ALL, args.page, &cancel).await;
    cancel.cancel();
    result?;

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_indexes() {
        let indexes = demo_indexes().unwrap();

        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[0].name, "category_by_id");
        assert_eq!(indexes[0].source_collection, "categories");
        assert_eq!(indexes[1].name, "products_by_category_id");
        assert!(indexes.iter().all(|index| !index.is_values_only()));
        assert!(indexes.iter().all(|index| index.validate().is_ok()));
    }
}
