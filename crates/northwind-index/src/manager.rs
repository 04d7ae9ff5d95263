//! Index creation and status.

use northwind_core::{Error, QueryService, Result, ValueExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::descriptor::IndexDescriptor;
use crate::poller::{IndexReadinessPoller, PollConfig, PollOutcome};
use crate::walker::PaginationWalker;
use crate::TRACING_TARGET_MANAGER;

/// Index as reported by the store right after its creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIndex {
    /// Name of the index.
    pub name: String,
    /// Whether the index build had already completed.
    pub active: bool,
}

impl CreatedIndex {
    fn from_response(response: &Value) -> Result<Self> {
        Ok(Self {
            name: response.require_str("name")?.to_owned(),
            active: response.require_bool("active")?,
        })
    }
}

/// Creates indexes and hands out pollers and walkers bound to one service.
#[derive(Debug, Clone)]
pub struct IndexManager {
    service: QueryService,
}

impl IndexManager {
    /// Creates a manager issuing its queries through `service`.
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }

    /// Submits the creation of the index described by `descriptor`.
    ///
    /// The store returns as soon as the index is registered. The build of
    /// the index over existing documents continues in the background.
    pub async fn create(&self, descriptor: &IndexDescriptor) -> Result<CreatedIndex> {
        descriptor.validate()?;

        tracing::info!(
            target: TRACING_TARGET_MANAGER,
            index = %descriptor.name,
            source = %descriptor.source_collection,
            terms = descriptor.terms.as_ref().map_or(0, Vec::len),
            values = descriptor.values.as_ref().map_or(0, Vec::len),
            "Creating index"
        );

        let response = self.service.query(&descriptor.to_create_expr()).await?;
        let created = CreatedIndex::from_response(&response)?;

        if created.name != descriptor.name {
            return Err(Error::malformed(
                "name",
                format!("index name '{}'", descriptor.name),
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_MANAGER,
            index = %created.name,
            active = created.active,
            "Index created"
        );

        Ok(created)
    }

    /// Creates the index and waits for it to become active.
    ///
    /// No status query is issued if the creation response already reports
    /// the index active.
    pub async fn create_and_await(
        &self,
        descriptor: &IndexDescriptor,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<(CreatedIndex, PollOutcome)> {
        config.validate()?;

        let created = self.create(descriptor).await?;
        if created.active {
            return Ok((created, PollOutcome::Active));
        }

        let outcome = self
            .poller()
            .await_active_with_cancel(&created.name, config, cancel)
            .await?;

        Ok((created, outcome))
    }

    /// Performs a single status query for `index_name`.
    pub async fn is_active(&self, index_name: &str) -> Result<bool> {
        self.poller().is_active(index_name).await
    }

    /// Returns a readiness poller sharing this manager's service.
    pub fn poller(&self) -> IndexReadinessPoller {
        IndexReadinessPoller::new(self.service.clone())
    }

    /// Returns a walker over `index_name` sharing this manager's service.
    pub fn walker(&self, index_name: impl Into<String>, page_size: u32) -> Result<PaginationWalker> {
        PaginationWalker::new(self.service.clone(), index_name, page_size)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use northwind_core::mock::MockQueryClient;
    use serde_json::json;

    use super::*;

    fn category_by_id() -> IndexDescriptor {
        IndexDescriptor::new("category_by_id", "categories")
            .with_terms(["data.name".parse().unwrap()])
            .with_values(["data.categoryID".parse().unwrap()])
    }

    fn created(active: bool) -> Value {
        json!({
            "ref": {"@ref": {"id": "category_by_id", "collection": {"@ref": {"id": "indexes"}}}},
            "ts": 1_548_697_127_190_000_i64,
            "active": active,
            "partitions": 1,
            "name": "category_by_id",
            "source": {"@ref": {"id": "categories", "collection": {"@ref": {"id": "classes"}}}}
        })
    }

    #[tokio::test]
    async fn test_create_reads_name_and_active() {
        let client = MockQueryClient::new();
        client.push_response(created(false));
        let manager = IndexManager::new(client.clone().into_service());

        let index = manager.create(&category_by_id()).await.unwrap();

        assert_eq!(
            index,
            CreatedIndex {
                name: "category_by_id".into(),
                active: false
            }
        );
        assert_eq!(
            client.queries()[0].as_json(),
            category_by_id().to_create_expr().as_json()
        );
    }

    #[tokio::test]
    async fn test_create_rejects_response_without_active() {
        let client = MockQueryClient::new();
        client.push_response(json!({"name": "category_by_id"}));
        let manager = IndexManager::new(client.into_service());

        let error = manager.create(&category_by_id()).await.unwrap_err();
        assert!(error.is_malformed());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_descriptor() {
        let client = MockQueryClient::new();
        let manager = IndexManager::new(client.clone().into_service());

        let error = manager
            .create(&IndexDescriptor::new("", "categories"))
            .await
            .unwrap_err();

        assert!(error.is_invalid_input());
        assert_eq!(client.query_count(), 0);
    }

    #[tokio::test]
    async fn test_create_and_await_skips_poll_when_active() {
        let client = MockQueryClient::new();
        client.push_response(created(true));
        let manager = IndexManager::new(client.clone().into_service());

        let (index, outcome) = manager
            .create_and_await(
                &category_by_id(),
                &PollConfig::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(index.active);
        assert_eq!(outcome, PollOutcome::Active);
        assert_eq!(client.query_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_and_await_polls_until_active() {
        let client = MockQueryClient::new();
        client.push_response(created(false));
        client.push_response(created(false));
        client.push_response(created(true));
        let manager = IndexManager::new(client.clone().into_service());

        let config = PollConfig::new(Duration::from_secs(20), Duration::from_secs(5));
        let (_, outcome) = manager
            .create_and_await(&category_by_id(), &config, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Active);
        assert_eq!(client.query_count(), 3);
        assert_eq!(
            client.queries()[1].as_json(),
            &json!({"get": {"index": "category_by_id"}})
        );
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let client = MockQueryClient::new();
        client.push_error(Error::store(400, "instance not unique", "document is not unique"));
        let manager = IndexManager::new(client.into_service());

        let error = manager.create(&category_by_id()).await.unwrap_err();
        assert!(error.is_transport());
    }

    #[test]
    fn test_walker_from_manager() {
        let manager = IndexManager::new(MockQueryClient::new().into_service());

        assert!(manager.walker("categories_all", 8).is_ok());
        assert!(manager.walker("categories_all", 0).is_err());
    }
}
