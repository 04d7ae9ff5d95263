//! Reqwest-based query client for the hosted document store.
//!
//! This crate provides [`ReqwestClient`], an implementation of
//! [`northwind_core::QueryClient`] speaking the store's JSON-over-HTTP
//! protocol.
//!
//! # Example
//!
//! ```rust,ignore
//! use northwind_core::Expr;
//! use northwind_reqwest::{ReqwestClient, ReqwestConfig};
//!
//! let config = ReqwestConfig::new("http://localhost:8443", secret);
//! let service = ReqwestClient::new(config)?.into_service();
//!
//! let index = service.query(&Expr::get(Expr::index("categories_all"))).await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod connect;
mod error;
mod service;

pub use crate::connect::{
    DEFAULT_API_VERSION, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, ReqwestClient, ReqwestConfig,
    TRACING_TARGET,
};
pub use crate::error::Error;
