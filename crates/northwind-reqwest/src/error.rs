//! Internal error types for northwind-reqwest.

use thiserror::Error;

/// Transport failure raised by the HTTP layer, before any store answer.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl From<Error> for northwind_core::Error {
    fn from(err: Error) -> Self {
        let Error::Reqwest(e) = err;
        if e.is_timeout() {
            northwind_core::Error::transport_with_source("Request timed out", e)
        } else if e.is_connect() {
            northwind_core::Error::transport_with_source("Connection failed", e)
        } else {
            northwind_core::Error::transport_with_source(e.to_string(), e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_error_maps_to_transport() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();

        let error: northwind_core::Error = Error::from(err).into();
        assert!(error.is_transport());
        assert!(std::error::Error::source(&error).is_some());
    }
}
