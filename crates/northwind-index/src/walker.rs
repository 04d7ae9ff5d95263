//! Walking a values-only index page by page.
//!
//! Each request depends on the cursor returned by the previous one, so pages
//! are fetched strictly one after another:
//!
//! ```text
//! Start ──fetch(size)──▶ page 1 (after c1) ──fetch(size, after c1)──▶ page 2 (after c2)
//!       ──fetch(size, after c2)──▶ page 3 (no after) ──▶ Exhausted
//! ```
//!
//! The store's `after` is inclusive: the page fetched with cursor `c` starts
//! at the entry `c` references. The cursor is forwarded verbatim and never
//! adjusted here. If the collection is written to during a walk, entries at
//! page boundaries may be skipped or repeated.

use std::ops::ControlFlow;

use futures::{Stream, StreamExt, TryStreamExt};
use northwind_core::{Error, Expr, QueryService, Result, ValueExt};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::descriptor::IndexDescriptor;
use crate::page::{Continuation, Cursor, Page};
use crate::TRACING_TARGET_WALKER;

/// Page size used by the demonstration walk.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// What each record of a page is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// The `data` field of each document the index entry references.
    #[default]
    Documents,
    /// The raw index entries.
    Entries,
}

/// Totals of a completed or stopped walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkSummary {
    /// Pages delivered to the visitor.
    pub pages: usize,
    /// Records across the delivered pages.
    pub records: usize,
    /// `true` if the last delivered page had no continuation.
    pub completed: bool,
}

/// Where the next fetch resumes from.
#[derive(Debug, Clone)]
enum WalkState {
    Start,
    Resume(Cursor),
    Exhausted,
}

/// Iterates over every entry of a values-only index.
///
/// The walker itself holds no cursor; each call to [`pages`](Self::pages)
/// starts a new walk from the beginning of the index.
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    service: QueryService,
    index_name: String,
    page_size: u32,
    projection: Projection,
}

impl PaginationWalker {
    /// Creates a walker over `index_name` fetching `page_size` entries per page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty name or a zero page size.
    pub fn new(service: QueryService, index_name: impl Into<String>, page_size: u32) -> Result<Self> {
        let index_name = index_name.into();
        if index_name.trim().is_empty() {
            return Err(Error::invalid_input("index name cannot be empty"));
        }
        if page_size == 0 {
            return Err(Error::invalid_input("page size must be positive"));
        }

        Ok(Self {
            service,
            index_name,
            page_size,
            projection: Projection::default(),
        })
    }

    /// Creates a walker over the index described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the index declares terms, since such
    /// an index cannot be matched without a term value.
    pub fn for_index(
        service: QueryService,
        descriptor: &IndexDescriptor,
        page_size: u32,
    ) -> Result<Self> {
        descriptor.validate()?;
        if !descriptor.is_values_only() {
            return Err(Error::invalid_input(format!(
                "index '{}' declares terms and cannot be paginated without a term value",
                descriptor.name
            )));
        }
        Self::new(service, descriptor.name.clone(), page_size)
    }

    /// Sets what each record of a page is.
    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Name of the index being walked.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Maximum number of records per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Builds the query for the page starting at `cursor`, or the first page.
    fn page_query(&self, cursor: Option<&Cursor>) -> Expr {
        let mut paginate =
            Expr::paginate(Expr::match_index(Expr::index(&self.index_name))).size(self.page_size);
        if let Some(cursor) = cursor {
            paginate = paginate.after(cursor.to_expr());
        }

        match self.projection {
            Projection::Entries => paginate.into(),
            Projection::Documents => Expr::map(
                paginate.into(),
                Expr::lambda("x", Expr::select("data", Expr::get(Expr::var("x")))),
            ),
        }
    }

    /// Fetches the page starting at `cursor`, or the first page when `None`.
    ///
    /// # Errors
    ///
    /// Returns the query failure as is, [`Error::MalformedResponse`] if the
    /// response has no `data` array or a non-array `after`, and
    /// [`Error::Serialization`] if a record does not decode into `T`.
    pub async fn fetch_page<T>(&self, cursor: Option<&Cursor>) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let expr = self.page_query(cursor);
        let response = self.service.query(&expr).await?;
        decode_page(response, cursor)
    }

    /// Returns a lazy stream over every page of the index.
    ///
    /// The stream fetches a page only when polled, ends after the first page
    /// without a continuation, and ends after yielding the first error. Each
    /// call starts a fresh walk.
    pub fn pages<T>(&self) -> impl Stream<Item = Result<Page<T>>> + Send + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        let walker = self.clone();

        async_stream::stream! {
            let mut state = WalkState::Start;
            let mut page_number: usize = 0;

            loop {
                let cursor = match &state {
                    WalkState::Start => None,
                    WalkState::Resume(cursor) => Some(cursor.clone()),
                    WalkState::Exhausted => break,
                };

                let result = walker.fetch_page::<T>(cursor.as_ref()).await;
                match result {
                    Ok(page) => {
                        page_number += 1;
                        tracing::debug!(
                            target: TRACING_TARGET_WALKER,
                            index = %walker.index_name,
                            page = page_number,
                            records = page.len(),
                            has_next = !page.is_last(),
                            "Fetched page"
                        );

                        state = match page.continuation() {
                            Continuation::After(next) => WalkState::Resume(next.clone()),
                            Continuation::End => WalkState::Exhausted,
                        };
                        yield Ok(page);
                    }
                    Err(error) => {
                        tracing::warn!(
                            target: TRACING_TARGET_WALKER,
                            index = %walker.index_name,
                            page = page_number + 1,
                            error = %error,
                            "Page fetch failed, aborting walk"
                        );

                        state = WalkState::Exhausted;
                        yield Err(error);
                    }
                }
            }
        }
    }

    /// Returns a lazy stream over every record of the index, in index order.
    pub fn records<T>(&self) -> impl Stream<Item = Result<T>> + Send + 'static
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.pages::<T>()
            .map_ok(|page| futures::stream::iter(page.into_records().into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }

    /// Collects every record of the index.
    pub async fn collect_records<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.records::<T>().try_collect().await
    }

    /// Walks the index, handing each page to `visit`.
    ///
    /// Returning [`ControlFlow::Break`] from `visit` stops the walk without
    /// fetching another page.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure. Pages visited before it remain valid.
    pub async fn for_each_page<T, F>(&self, mut visit: F) -> Result<WalkSummary>
    where
        T: DeserializeOwned + Send + 'static,
        F: FnMut(Page<T>) -> ControlFlow<()>,
    {
        let pages = self.pages::<T>();
        futures::pin_mut!(pages);

        let mut summary = WalkSummary::default();
        while let Some(page) = pages.next().await {
            let page = page?;
            summary.pages += 1;
            summary.records += page.len();
            summary.completed = page.is_last();

            if visit(page).is_break() {
                tracing::debug!(
                    target: TRACING_TARGET_WALKER,
                    index = %self.index_name,
                    pages = summary.pages,
                    "Walk stopped by visitor"
                );
                break;
            }
        }

        tracing::info!(
            target: TRACING_TARGET_WALKER,
            index = %self.index_name,
            pages = summary.pages,
            records = summary.records,
            completed = summary.completed,
            "Walk finished"
        );

        Ok(summary)
    }
}

/// Splits a paginate response into records and continuation.
fn decode_page<T>(response: Value, previous: Option<&Cursor>) -> Result<Page<T>>
where
    T: DeserializeOwned,
{
    let continuation = match response.at("after") {
        Some(after @ Value::Array(_)) => {
            let next = Cursor::from_response(after.clone());
            if previous == Some(&next) {
                return Err(Error::malformed("after", "cursor past the previous page"));
            }
            Continuation::After(next)
        }
        Some(_) => return Err(Error::malformed("after", "array")),
        None => Continuation::End,
    };

    let records = response
        .require_array("data")?
        .iter()
        .cloned()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Page::new(records, continuation))
}
