//! Query service implementation.
//!
//! This module implements the [`QueryClient`] trait for [`ReqwestClient`].

use std::time::Instant;

use northwind_core::{Expr, QueryClient, ServiceHealth};
use serde::Deserialize;
use serde_json::Value;

use crate::connect::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;

/// Header carrying the requested query-language version.
const API_VERSION_HEADER: &str = "X-FaunaDB-API-Version";

/// A single entry of the store's `errors` array.
#[derive(Debug, Deserialize)]
struct StoreError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<StoreError>,
}

#[async_trait::async_trait]
impl QueryClient for ReqwestClient {
    async fn query(&self, expr: &Expr) -> northwind_core::Result<Value> {
        let config = self.config();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %self.endpoint(),
            "Sending query"
        );

        let http_response = self
            .http()
            .post(self.endpoint().clone())
            .basic_auth(&config.store_secret, Some(""))
            .header(API_VERSION_HEADER, &config.api_version)
            .json(expr)
            .send()
            .await
            .map_err(Error::from)?;

        let status_code = http_response.status().as_u16();
        let body = http_response.bytes().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            status_code,
            body_bytes = body.len(),
            "Query response received"
        );

        decode_response(status_code, &body)
    }

    async fn health_check(&self) -> northwind_core::Result<ServiceHealth> {
        let started_at = Instant::now();
        let result = self
            .http()
            .get(self.ping_url().clone())
            .basic_auth(&self.config().store_secret, Some(""))
            .send()
            .await;
        let elapsed = started_at.elapsed();

        let health = match result {
            Ok(response) => ServiceHealth::answered(response.status().as_u16(), elapsed),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Health check failed"
                );
                ServiceHealth::unreachable(err.to_string())
            }
        };

        Ok(health)
    }
}

/// Turns a raw HTTP response into the query result.
///
/// Successful responses carry the result under `resource`. Failed responses
/// carry `errors`, of which the first is reported.
fn decode_response(status_code: u16, body: &[u8]) -> northwind_core::Result<Value> {
    let success = (200..300).contains(&status_code);

    if !success {
        let first = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.errors.into_iter().next());

        return Err(match first {
            Some(error) => northwind_core::Error::store(status_code, error.code, error.description),
            None => northwind_core::Error::store(
                status_code,
                "unknown",
                String::from_utf8_lossy(body).chars().take(512).collect::<String>(),
            ),
        });
    }

    let parsed: Value = serde_json::from_slice(body)
        .map_err(|_| northwind_core::Error::malformed("resource", "JSON response body"))?;

    match parsed {
        Value::Object(mut fields) => fields
            .remove("resource")
            .ok_or_else(|| northwind_core::Error::malformed("resource", "query result")),
        _ => Err(northwind_core::Error::malformed("resource", "query result")),
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use northwind_core::{Error as CoreError, ServiceStatus};
    use serde_json::json;

    use super::*;
    use crate::ReqwestConfig;

    #[test]
    fn test_decode_resource() {
        let body = br#"{"resource": {"name": "categories_all", "active": true}}"#;
        let value = decode_response(200, body).unwrap();
        assert_eq!(value, json!({"name": "categories_all", "active": true}));
    }

    #[test]
    fn test_decode_null_resource() {
        let value = decode_response(200, br#"{"resource": null}"#).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn test_decode_missing_resource_is_malformed() {
        let error = decode_response(200, br#"{"result": 1}"#).unwrap_err();
        assert!(error.is_malformed());

        let error = decode_response(200, b"<html>").unwrap_err();
        assert!(error.is_malformed());
    }

    #[test]
    fn test_decode_store_error() {
        let body = br#"{"errors": [{"position": [], "code": "invalid ref", "description": "Ref refers to undefined index 'missing'"}]}"#;
        let error = decode_response(400, body).unwrap_err();

        match error {
            CoreError::Store {
                status,
                code,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid ref");
                assert!(description.contains("missing"));
            }
            other => panic!("expected store error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_store_error_without_body() {
        let error = decode_response(503, b"Service Unavailable").unwrap_err();
        assert!(error.is_transport());
        assert!(error.to_string().contains("503"));
    }

    /// Returns a local URL on which nothing listens.
    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        let config = ReqwestConfig::new(closed_port_url(), "secret").with_timeout(2);
        let client = ReqwestClient::new(config).unwrap();

        let error = client.query(&Expr::null()).await.unwrap_err();
        assert!(error.is_transport());

        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, ServiceStatus::Unhealthy);
        assert!(health.latency.is_none());
    }
}
