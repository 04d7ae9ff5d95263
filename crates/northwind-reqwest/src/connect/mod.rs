//! Reqwest client module.
//!
//! This module provides the connection half of the crate: configuration and
//! the shared HTTP client. Query execution lives in the service module.

mod client;
mod config;

pub use client::{ReqwestClient, TRACING_TARGET};
pub use config::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, ReqwestConfig};
