//! Query client trait and the observable service wrapper.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::{Expr, Result, ServiceHealth, TRACING_TARGET_CLIENT};

/// Core trait for executing queries against the document store.
///
/// Implementations send one expression per call and return the structured
/// result, or the failure that prevented it. Implementations must not retry.
#[async_trait::async_trait]
pub trait QueryClient: Send + Sync {
    /// Executes a query expression.
    async fn query(&self, expr: &Expr) -> Result<Value>;

    /// Performs a health check against the store.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

/// Query service wrapper with observability.
///
/// This wrapper adds structured logging to any [`QueryClient`] implementation.
/// The inner client is wrapped in `Arc` for cheap cloning, so one service can
/// be shared by any number of concurrent polls and walks.
#[derive(Clone)]
pub struct QueryService {
    inner: Arc<dyn QueryClient>,
}

impl fmt::Debug for QueryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryService").finish_non_exhaustive()
    }
}

impl QueryService {
    /// Create a new query service wrapper.
    pub fn new<C>(client: C) -> Self
    where
        C: QueryClient + 'static,
    {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Executes a query expression.
    pub async fn query(&self, expr: &Expr) -> Result<Value> {
        let started_at = Instant::now();

        tracing::trace!(
            target: TRACING_TARGET_CLIENT,
            expr = %expr.as_json(),
            "Executing query"
        );

        let result = self.inner.query(expr).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET_CLIENT,
                    elapsed_ms = elapsed.as_millis(),
                    "Query completed"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CLIENT,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Query failed"
                );
            }
        }

        result
    }

    /// Performs a health check against the store.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.inner.health_check().await
    }
}
