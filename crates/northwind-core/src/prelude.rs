//! Prelude module for northwind-core.
//!
//! Re-exports the types needed to build expressions and talk to a store with
//! a single `use` statement.

pub use crate::{Error, Expr, QueryClient, QueryService, Result, ServiceHealth, ValueExt};
