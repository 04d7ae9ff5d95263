//! Query expression builder.
//!
//! [`Expr`] is a thin wrapper over the JSON wire encoding of the store's query
//! language. Only the functions the index and pagination protocols need are
//! provided:
//!
//! ```text
//! {"create_index": {"object": {...}}}
//! {"get": {"index": "categories_all"}}
//! {"map": {"lambda": "x", "expr": ...}, "collection": {"paginate": ..., "size": 8}}
//! ```
//!
//! Object literals are always wrapped in `{"object": ...}` so the store does
//! not mistake their keys for function names.

use serde::Serialize;
use serde_json::{Map, Value};

/// A query expression ready to be sent to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Expr(Value);

impl Expr {
    /// The `null` literal.
    pub fn null() -> Self {
        Self(Value::Null)
    }

    /// Array literal.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Self(Value::Array(
            items.into_iter().map(|item| item.into().0).collect(),
        ))
    }

    /// Object literal with the given fields, in insertion order.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Expr)>,
        K: Into<String>,
    {
        let fields: Map<String, Value> = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.0))
            .collect();
        Self::call("object", Value::Object(fields))
    }

    /// Lifts a value received from the store back into an expression.
    ///
    /// Plain objects are re-wrapped as object literals; tagged values such as
    /// `{"@ref": ...}` or `{"@ts": ...}` are forwarded untouched.
    pub fn from_value(value: &Value) -> Self {
        Self(quote(value))
    }

    /// Reference to an index by name.
    pub fn index(name: impl Into<Expr>) -> Self {
        Self::call("index", name.into().0)
    }

    /// Reference to a class (collection) by name.
    pub fn class(name: impl Into<Expr>) -> Self {
        Self::call("class", name.into().0)
    }

    /// Reads the document or schema object referenced by `reference`.
    pub fn get(reference: Expr) -> Self {
        Self::call("get", reference.0)
    }

    /// Reads the value at `path` (a field name or an array of them) from `from`.
    pub fn select(path: impl Into<Expr>, from: Expr) -> Self {
        let mut fields = Map::new();
        fields.insert("select".to_owned(), path.into().0);
        fields.insert("from".to_owned(), from.0);
        Self(Value::Object(fields))
    }

    /// The set of entries of `index`.
    pub fn match_index(index: Expr) -> Self {
        Self::call("match", index.0)
    }

    /// Starts a paginate expression over `set`.
    pub fn paginate(set: Expr) -> Paginate {
        Paginate {
            set,
            size: None,
            after: None,
        }
    }

    /// Applies `lambda` to every element of `collection`.
    pub fn map(collection: Expr, lambda: Expr) -> Self {
        let mut fields = Map::new();
        fields.insert("map".to_owned(), lambda.0);
        fields.insert("collection".to_owned(), collection.0);
        Self(Value::Object(fields))
    }

    /// Anonymous function binding `param` inside `body`.
    pub fn lambda(param: impl Into<String>, body: Expr) -> Self {
        let mut fields = Map::new();
        fields.insert("lambda".to_owned(), Value::String(param.into()));
        fields.insert("expr".to_owned(), body.0);
        Self(Value::Object(fields))
    }

    /// Reference to a lambda parameter.
    pub fn var(name: impl Into<String>) -> Self {
        Self::call("var", Value::String(name.into()))
    }

    /// Submits an index definition for creation.
    pub fn create_index(definition: Expr) -> Self {
        Self::call("create_index", definition.0)
    }

    /// Returns the wire encoding of this expression.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the expression, returning its wire encoding.
    pub fn into_json(self) -> Value {
        self.0
    }

    fn call(function: &str, argument: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(function.to_owned(), argument);
        Self(Value::Object(fields))
    }
}

/// Builder for `paginate` expressions.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Paginate {
    set: Expr,
    size: Option<u32>,
    after: Option<Expr>,
}

impl Paginate {
    /// Maximum number of entries in the returned page.
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Resume point; the page starts at the entry the cursor references.
    pub fn after(mut self, cursor: Expr) -> Self {
        self.after = Some(cursor);
        self
    }
}

impl From<Paginate> for Expr {
    fn from(paginate: Paginate) -> Self {
        let mut fields = Map::new();
        fields.insert("paginate".to_owned(), paginate.set.0);
        if let Some(size) = paginate.size {
            fields.insert("size".to_owned(), Value::from(size));
        }
        if let Some(after) = paginate.after {
            fields.insert("after".to_owned(), after.0);
        }
        Expr(Value::Object(fields))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_owned()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<&String> for Expr {
    fn from(value: &String) -> Self {
        Self(Value::String(value.clone()))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Self(Value::from(value))
    }
}

fn quote(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(quote).collect()),
        Value::Object(fields) => {
            if let Some(inner) = fields.get("@obj").filter(|_| fields.len() == 1) {
                return match inner {
                    Value::Object(_) => wrap_object(inner),
                    other => other.clone(),
                };
            }
            if fields.keys().any(|key| key.starts_with('@')) {
                value.clone()
            } else {
                wrap_object(value)
            }
        }
        other => other.clone(),
    }
}

fn wrap_object(value: &Value) -> Value {
    let Value::Object(fields) = value else {
        return value.clone();
    };
    let quoted: Map<String, Value> = fields
        .iter()
        .map(|(key, inner)| (key.clone(), quote(inner)))
        .collect();
    let mut wrapper = Map::new();
    wrapper.insert("object".to_owned(), Value::Object(quoted));
    Value::Object(wrapper)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_paginate_without_cursor() {
        let expr: Expr = Expr::paginate(Expr::match_index(Expr::index("categories_all")))
            .size(8)
            .into();

        assert_eq!(
            expr.into_json(),
            json!({"paginate": {"match": {"index": "categories_all"}}, "size": 8})
        );
    }

    #[test]
    fn test_paginate_with_cursor_and_map() {
        let cursor = Expr::from_value(&json!([{"@ref": {"id": "7"}}]));
        let page = Expr::paginate(Expr::match_index(Expr::index("categories_all")))
            .size(2)
            .after(cursor);
        let expr = Expr::map(
            page.into(),
            Expr::lambda("x", Expr::select("data", Expr::get(Expr::var("x")))),
        );

        assert_eq!(
            expr.into_json(),
            json!({
                "map": {"lambda": "x", "expr": {"select": "data", "from": {"get": {"var": "x"}}}},
                "collection": {
                    "paginate": {"match": {"index": "categories_all"}},
                    "size": 2,
                    "after": [{"@ref": {"id": "7"}}]
                }
            })
        );
    }

    #[test]
    fn test_object_literal_is_wrapped() {
        let expr = Expr::object([
            ("name", Expr::from("category_by_id")),
            ("source", Expr::class("categories")),
        ]);

        assert_eq!(
            expr.into_json(),
            json!({"object": {"name": "category_by_id", "source": {"class": "categories"}}})
        );
    }

    #[test]
    fn test_from_value_quotes_plain_objects() {
        let value = json!(["a", {"id": 3, "nested": {"k": [1, 2]}}, {"@ts": "2018-01-01T00:00:00Z"}]);
        let expr = Expr::from_value(&value);

        assert_eq!(
            expr.into_json(),
            json!([
                "a",
                {"object": {"id": 3, "nested": {"object": {"k": [1, 2]}}}},
                {"@ts": "2018-01-01T00:00:00Z"}
            ])
        );
    }

    #[test]
    fn test_from_value_unwraps_tagged_object() {
        let value = json!({"@obj": {"@name": "x"}});
        let expr = Expr::from_value(&value);

        assert_eq!(expr.into_json(), json!({"object": {"@name": "x"}}));
    }

    #[test]
    fn test_select_with_array_path() {
        let expr = Expr::select(
            Expr::array(["data", "name"]),
            Expr::get(Expr::index("categories_all")),
        );

        assert_eq!(
            expr.into_json(),
            json!({"select": ["data", "name"], "from": {"get": {"index": "categories_all"}}})
        );
    }
}
