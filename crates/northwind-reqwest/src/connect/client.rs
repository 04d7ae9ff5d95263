//! Reqwest-based HTTP client for store queries.

use std::sync::Arc;

use northwind_core::QueryService;
use reqwest::Client;
use url::Url;

use super::ReqwestConfig;

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "northwind_reqwest::client";

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    endpoint: Url,
    ping: Url,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for executing queries against the store.
///
/// This client implements the [`QueryClient`] trait. It is cheap to clone:
/// clones share one connection pool.
///
/// # Examples
///
/// ```rust,ignore
/// use northwind_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let config = ReqwestConfig::new("https://db.example.com", secret);
/// let client = ReqwestClient::new(config)?;
/// let value = client.query(&Expr::get(Expr::index("categories_all"))).await?;
/// ```
///
/// [`QueryClient`]: northwind_core::QueryClient
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ReqwestConfig) -> northwind_core::Result<Self> {
        config.validate()?;

        let endpoint = config.endpoint_url()?;
        let ping = endpoint
            .join("ping")
            .map_err(|e| northwind_core::Error::invalid_config(e.to_string()))?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(crate::Error::from)?;

        let inner = ReqwestClientInner {
            http,
            endpoint,
            ping,
            config,
        };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            endpoint = %client.inner.endpoint,
            "Reqwest client created successfully"
        );

        Ok(client)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the query endpoint.
    pub(crate) fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Gets the health probe endpoint.
    pub(crate) fn ping_url(&self) -> &Url {
        &self.inner.ping
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`QueryService`] for use with dependency injection.
    pub fn into_service(self) -> QueryService {
        QueryService::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ReqwestConfig::new("http://localhost:8443", "secret");
        let client = ReqwestClient::new(config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8443/");
        assert_eq!(client.ping_url().as_str(), "http://localhost:8443/ping");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ReqwestConfig::new("http://localhost:8443", "");
        let error = ReqwestClient::new(config).unwrap_err();
        assert!(error.is_invalid_input());
    }
}
