//! Reqwest client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use northwind_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default store endpoint: a local development instance.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8443";

/// Default timeout for HTTP requests: 60 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default query-language version requested from the store.
pub const DEFAULT_API_VERSION: &str = "2.1";

/// Connection settings for the store.
///
/// The endpoint and secret are always passed explicitly; nothing is read from
/// process-wide state unless the `config` feature wires the fields to clap.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Store endpoint URL
    #[cfg_attr(
        feature = "config",
        arg(long = "store-endpoint", env = "STORE_ENDPOINT", default_value = DEFAULT_ENDPOINT)
    )]
    #[serde(default = "default_endpoint")]
    pub store_endpoint: String,

    /// Database-scoped access secret
    #[cfg_attr(
        feature = "config",
        arg(long = "store-secret", env = "STORE_SECRET", hide_env_values = true)
    )]
    pub store_secret: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "store-timeout", env = "STORE_TIMEOUT", default_value = "60")
    )]
    #[serde(default = "default_timeout_secs")]
    pub store_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "store-user-agent", env = "STORE_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Query-language version header value
    #[cfg_attr(
        feature = "config",
        arg(long = "store-api-version", env = "STORE_API_VERSION", default_value = DEFAULT_API_VERSION)
    )]
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

impl fmt::Debug for ReqwestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestConfig")
            .field("store_endpoint", &self.store_endpoint)
            .field("store_secret", &"<redacted>")
            .field("store_timeout", &self.store_timeout)
            .field("user_agent", &self.user_agent)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ReqwestConfig {
    /// Create a new configuration for the given endpoint and secret.
    pub fn new(endpoint: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            store_endpoint: endpoint.into(),
            store_secret: secret.into(),
            store_timeout: default_timeout_secs(),
            user_agent: None,
            api_version: default_api_version(),
        }
    }

    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout)
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.store_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.store_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("northwind/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Parses and validates the endpoint URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.store_endpoint).map_err(|e| {
            Error::invalid_config(format!("invalid store endpoint '{}': {e}", self.store_endpoint))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::invalid_config(format!(
                "unsupported endpoint scheme '{scheme}'"
            ))),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;
        if self.store_secret.trim().is_empty() {
            return Err(Error::invalid_config("store secret cannot be empty"));
        }
        if self.api_version.trim().is_empty() {
            return Err(Error::invalid_config("api version cannot be empty"));
        }
        Ok(())
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.store_endpoint = endpoint.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.store_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the query-language version header.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = ReqwestConfig::new("https://db.example.com", "secret");
        assert_eq!(config.store_timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReqwestConfig::new(DEFAULT_ENDPOINT, "secret")
            .with_endpoint("https://db.example.com")
            .with_timeout(5)
            .with_user_agent("custom-agent/1.0")
            .with_api_version("4");

        assert_eq!(config.store_endpoint, "https://db.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent.as_deref(), Some("custom-agent/1.0"));
        assert_eq!(config.api_version, "4");
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = ReqwestConfig::new(DEFAULT_ENDPOINT, "secret").with_timeout(0);
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_effective_user_agent_uses_default_when_none() {
        let config = ReqwestConfig::new(DEFAULT_ENDPOINT, "secret");
        assert!(config.effective_user_agent().contains("northwind"));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint_and_secret() {
        let config = ReqwestConfig::new("not a url", "secret");
        assert!(config.validate().unwrap_err().is_invalid_input());

        let config = ReqwestConfig::new("ftp://db.example.com", "secret");
        assert!(config.validate().is_err());

        let config = ReqwestConfig::new(DEFAULT_ENDPOINT, "   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ReqwestConfig::new(DEFAULT_ENDPOINT, "fnAC9Fs-top-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ReqwestConfig =
            serde_json::from_str(r#"{"store_secret": "secret"}"#).unwrap();
        assert_eq!(config.store_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.store_timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
