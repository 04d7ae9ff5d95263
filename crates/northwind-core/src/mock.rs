//! Scripted query client for testing.
//!
//! [`MockQueryClient`] answers queries from a queue of scripted responses and
//! records every expression it receives, so tests can assert on the exact
//! sequence of round trips a protocol performs.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! northwind-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use northwind_core::mock::MockQueryClient;
//!
//! let client = MockQueryClient::new();
//! client.push_response(json!({"active": false}));
//! client.push_response(json!({"active": true}));
//!
//! let service = client.clone().into_service();
//! // ... run the protocol ...
//! assert_eq!(client.query_count(), 2);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::{Error, Expr, QueryClient, QueryService, Result, ServiceHealth};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<Result<Value>>,
    fallback: Option<Value>,
    queries: Vec<Expr>,
}

/// Query client that replays scripted responses.
///
/// Clones share the same script and query log.
#[derive(Clone, Debug, Default)]
pub struct MockQueryClient {
    state: Arc<Mutex<MockState>>,
}

impl MockQueryClient {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a successful response to the script.
    pub fn push_response(&self, value: Value) {
        self.lock().responses.push_back(Ok(value));
    }

    /// Appends a failure to the script.
    pub fn push_error(&self, error: Error) {
        self.lock().responses.push_back(Err(error));
    }

    /// Sets the response returned once the script is exhausted.
    #[must_use]
    pub fn with_fallback(self, value: Value) -> Self {
        self.lock().fallback = Some(value);
        self
    }

    /// Returns every expression received so far, in order.
    pub fn queries(&self) -> Vec<Expr> {
        self.lock().queries.clone()
    }

    /// Returns the number of queries received so far.
    pub fn query_count(&self) -> usize {
        self.lock().queries.len()
    }

    /// Converts this client into a [`QueryService`].
    pub fn into_service(self) -> QueryService {
        QueryService::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl QueryClient for MockQueryClient {
    async fn query(&self, expr: &Expr) -> Result<Value> {
        let mut state = self.lock();
        state.queries.push(expr.clone());

        match state.responses.pop_front() {
            Some(response) => response,
            None => state
                .fallback
                .clone()
                .ok_or_else(|| Error::transport("mock client script exhausted")),
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::local())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let client = MockQueryClient::new().with_fallback(json!({"active": false}));
        client.push_response(json!({"active": true}));

        assert_eq!(client.query(&Expr::null()).await.unwrap(), json!({"active": true}));
        assert_eq!(client.query(&Expr::null()).await.unwrap(), json!({"active": false}));
        assert_eq!(client.query_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let client = MockQueryClient::new();
        let error = client.query(&Expr::null()).await.unwrap_err();
        assert!(error.is_transport());
    }
}
