#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for index readiness polling.
///
/// Use this target for logging poll start, per-cycle status checks, activation and timeouts.
pub const TRACING_TARGET_POLLER: &str = "northwind_index::poller";

/// Tracing target for cursor pagination.
///
/// Use this target for logging page fetches, walk completion and aborted walks.
pub const TRACING_TARGET_WALKER: &str = "northwind_index::walker";

/// Tracing target for index creation.
pub const TRACING_TARGET_MANAGER: &str = "northwind_index::manager";

mod descriptor;
mod manager;
mod page;
mod poller;
mod walker;

pub mod prelude;

pub use descriptor::{FieldPath, IndexDescriptor};
pub use manager::{CreatedIndex, IndexManager};
pub use page::{Continuation, Cursor, Page};
pub use poller::{
    DEFAULT_INTERVAL, DEFAULT_MAX_WAIT, IndexReadinessPoller, PollConfig, PollOutcome,
};
pub use walker::{DEFAULT_PAGE_SIZE, PaginationWalker, Projection, WalkSummary};
