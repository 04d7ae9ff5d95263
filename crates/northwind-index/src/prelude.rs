//! Prelude module for northwind-index.
//!
//! ```rust,ignore
//! use northwind_index::prelude::*;
//!
//! # async fn example(service: QueryService) -> Result<()> {
//! let poller = IndexReadinessPoller::new(service.clone());
//! if poller.await_active("categories_all", DEFAULT_MAX_WAIT, DEFAULT_INTERVAL).await?.is_active() {
//!     let categories: Vec<serde_json::Value> = PaginationWalker::new(service, "categories_all", 8)?
//!         .collect_records()
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub use northwind_core::prelude::*;

pub use crate::descriptor::{FieldPath, IndexDescriptor};
pub use crate::manager::{CreatedIndex, IndexManager};
pub use crate::page::{Continuation, Cursor, Page};
pub use crate::poller::{
    DEFAULT_INTERVAL, DEFAULT_MAX_WAIT, IndexReadinessPoller, PollConfig, PollOutcome,
};
pub use crate::walker::{DEFAULT_PAGE_SIZE, PaginationWalker, Projection, WalkSummary};
