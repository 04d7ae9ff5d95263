//! Pages and continuation cursors.

use std::fmt;

use northwind_core::Expr;
use serde_json::Value;

/// Opaque resume point returned by the store.
///
/// A cursor is only ever obtained from a page and forwarded verbatim on the
/// next request. It cannot be constructed or edited by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor(Value);

impl Cursor {
    pub(crate) fn from_response(value: Value) -> Self {
        Self(value)
    }

    pub(crate) fn to_expr(&self) -> Expr {
        Expr::from_value(&self.0)
    }

    /// Returns the raw token, for logging.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What follows a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// More records follow; resume from this cursor.
    After(Cursor),
    /// The walk is complete.
    End,
}

impl Continuation {
    /// Returns the cursor, if more records follow.
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::After(cursor) => Some(cursor),
            Self::End => None,
        }
    }
}

/// One page of records in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    records: Vec<T>,
    continuation: Continuation,
}

impl<T> Page<T> {
    pub(crate) fn new(records: Vec<T>, continuation: Continuation) -> Self {
        Self {
            records,
            continuation,
        }
    }

    /// Records in this page, in index order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Consumes the page, returning its records.
    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    /// What follows this page.
    pub fn continuation(&self) -> &Continuation {
        &self.continuation
    }

    /// Returns `true` if no page follows this one.
    pub fn is_last(&self) -> bool {
        matches!(self.continuation, Continuation::End)
    }

    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
