//! Error types shared by every northwind crate.

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for all northwind operations.
///
/// This is a convenience type alias that defaults to using [`Error`] as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for store queries and the protocols built on them.
///
/// The variants follow three families:
///
/// - transport and store failures ([`Error::Transport`], [`Error::Store`]),
///   where the request could not complete or the store refused it;
/// - protocol failures ([`Error::MalformedResponse`]), where the store answered
///   but the answer lacks a field the caller depends on;
/// - local failures ([`Error::InvalidInput`], [`Error::InvalidConfig`],
///   [`Error::Serialization`]) raised before or after the round trip.
///
/// A readiness poll running out of time is not an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be completed (connection, TLS, client timeout).
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// The store received the query and rejected it.
    #[error("Store rejected query (HTTP {status}): [{code}] {description}")]
    Store {
        status: u16,
        code: String,
        description: String,
    },

    /// The response is missing an expected field or has the wrong shape.
    #[error("Malformed response: expected {expected} at '{path}'")]
    MalformedResponse { path: String, expected: String },

    /// Caller supplied arguments that violate an operation's preconditions.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping the underlying failure.
    pub fn transport_with_source(message: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a store rejection error
    pub fn store(status: u16, code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Store {
            status,
            code: code.into(),
            description: description.into(),
        }
    }

    /// Create a malformed response error for the given field path.
    pub fn malformed(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the store could not be reached or refused the query.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Store { .. })
    }

    /// Returns `true` if the store answered with an unexpected shape.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }

    /// Returns `true` for errors raised before any request was sent.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::transport("connection refused").is_transport());
        assert!(Error::store(400, "invalid ref", "index not found").is_transport());
        assert!(Error::malformed("data", "array").is_malformed());
        assert!(!Error::malformed("data", "array").is_transport());
        assert!(Error::invalid_input("page size must be positive").is_invalid_input());
        assert!(Error::invalid_config("missing secret").is_invalid_input());
    }

    #[test]
    fn test_error_display() {
        let error = Error::store(404, "instance not found", "Index not found.");
        let display = error.to_string();
        assert!(display.contains("404"));
        assert!(display.contains("instance not found"));

        let error = Error::malformed("after", "array");
        assert_eq!(
            error.to_string(),
            "Malformed response: expected array at 'after'"
        );
    }

    #[test]
    fn test_transport_source() {
        let io = std::io::Error::other("reset by peer");
        let error = Error::transport_with_source("request failed", io);
        assert!(error.source().is_some());
        assert!(Error::transport("request failed").source().is_none());
    }
}
