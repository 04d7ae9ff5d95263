#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for query execution.
///
/// Use this target for logging individual round trips to the store.
pub const TRACING_TARGET_CLIENT: &str = "northwind_core::client";

mod client;
mod error;
mod expr;
mod health;
mod value;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
pub mod prelude;

pub use client::{QueryClient, QueryService};
pub use error::{BoxedError, Error, Result};
pub use expr::{Expr, Paginate};
pub use health::{ServiceHealth, ServiceStatus};
pub use value::ValueExt;
