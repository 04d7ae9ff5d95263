//! Index definitions.

use std::fmt;
use std::str::FromStr;

use derive_more::Deref;
use northwind_core::{Error, Expr, Result};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An ordered path into a document, e.g. `data.categoryID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Creates a path from its segments.
    ///
    /// # Errors
    ///
    /// Returns an error if the path or any of its segments is empty.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::invalid_input("field path cannot be empty"));
        }
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(Error::invalid_input(format!(
                "field path '{}' has an empty segment",
                segments.join(".")
            )));
        }
        Ok(Self(segments))
    }

    fn to_expr(&self) -> Expr {
        Expr::array(self.0.iter())
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.split('.'))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Definition of a secondary index over a collection.
///
/// An index with `terms` must be queried with a matching term value per
/// lookup. An index with only `values` can be matched without arguments and
/// is the only kind that can be walked page by page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct IndexDescriptor {
    /// Index name, unique per store.
    pub name: String,
    /// Collection (class) the index reads from.
    pub source_collection: String,
    /// Fields every lookup must supply a value for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<FieldPath>>,
    /// Fields returned by the index, in sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FieldPath>>,
}

impl IndexDescriptor {
    /// Creates a descriptor with neither terms nor values.
    pub fn new(name: impl Into<String>, source_collection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_collection: source_collection.into(),
            terms: None,
            values: None,
        }
    }

    /// Sets the term fields. An empty list clears them.
    #[must_use]
    pub fn with_terms(mut self, terms: impl IntoIterator<Item = FieldPath>) -> Self {
        self.terms = non_empty(terms.into_iter().collect());
        self
    }

    /// Sets the value fields. An empty list clears them.
    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = FieldPath>) -> Self {
        self.values = non_empty(values.into_iter().collect());
        self
    }

    /// Returns `true` if the index can be matched without term values.
    pub fn is_values_only(&self) -> bool {
        self.terms.as_ref().is_none_or(Vec::is_empty)
    }

    /// Validates the descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("index name cannot be empty"));
        }
        if self.source_collection.trim().is_empty() {
            return Err(Error::invalid_input(format!(
                "index '{}' has no source collection",
                self.name
            )));
        }
        for path in self.terms.iter().chain(self.values.iter()).flatten() {
            if path.is_empty() || path.iter().any(|segment| segment.trim().is_empty()) {
                return Err(Error::invalid_input(format!(
                    "index '{}' has an invalid field path '{path}'",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Builds the `create_index` expression for this descriptor.
    pub fn to_create_expr(&self) -> Expr {
        let mut fields = vec![
            ("name", Expr::from(&self.name)),
            ("source", Expr::class(&self.source_collection)),
        ];
        if let Some(terms) = self.terms.as_deref().filter(|terms| !terms.is_empty()) {
            fields.push(("terms", field_list(terms)));
        }
        if let Some(values) = self.values.as_deref().filter(|values| !values.is_empty()) {
            fields.push(("values", field_list(values)));
        }

        Expr::create_index(Expr::object(fields))
    }
}

fn non_empty(paths: Vec<FieldPath>) -> Option<Vec<FieldPath>> {
    (!paths.is_empty()).then_some(paths)
}

fn field_list(paths: &[FieldPath]) -> Expr {
    Expr::array(
        paths
            .iter()
            .map(|path| Expr::object([("field", path.to_expr())])),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn test_field_path_parsing() {
        let parsed = path("data.categoryID");
        assert_eq!(parsed.as_slice(), ["data", "categoryID"]);
        assert_eq!(parsed.to_string(), "data.categoryID");

        assert!("".parse::<FieldPath>().is_err());
        assert!("data..name".parse::<FieldPath>().is_err());
        assert!(FieldPath::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_create_expr_with_terms_and_values() {
        let descriptor = IndexDescriptor::new("category_by_id", "categories")
            .with_terms([path("data.name")])
            .with_values([path("data.categoryID")]);

        assert!(!descriptor.is_values_only());
        assert_eq!(
            descriptor.to_create_expr().into_json(),
            json!({"create_index": {"object": {
                "name": "category_by_id",
                "source": {"class": "categories"},
                "terms": [{"object": {"field": ["data", "name"]}}],
                "values": [{"object": {"field": ["data", "categoryID"]}}]
            }}})
        );
    }

    #[test]
    fn test_create_expr_without_fields() {
        let descriptor = IndexDescriptor::new("categories_all", "categories");

        assert!(descriptor.is_values_only());
        assert_eq!(
            descriptor.to_create_expr().into_json(),
            json!({"create_index": {"object": {
                "name": "categories_all",
                "source": {"class": "categories"}
            }}})
        );
    }

    #[test]
    fn test_empty_lists_normalise_to_absent() {
        let descriptor = IndexDescriptor::new("categories_all", "categories")
            .with_terms(Vec::new())
            .with_values(Vec::new());

        assert!(descriptor.terms.is_none());
        assert!(descriptor.values.is_none());
        assert!(descriptor.is_values_only());
    }

    #[test]
    fn test_validate() {
        assert!(IndexDescriptor::new("", "categories").validate().is_err());
        assert!(IndexDescriptor::new("categories_all", " ").validate().is_err());
        assert!(
            IndexDescriptor::new("categories_all", "categories")
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_deserialize_descriptor() {
        let descriptor: IndexDescriptor = serde_json::from_value(json!({
            "name": "products_by_category_id",
            "source_collection": "products",
            "terms": [["data", "categoryID"]]
        }))
        .unwrap();

        assert_eq!(descriptor.terms, Some(vec![path("data.categoryID")]));
        assert!(descriptor.values.is_none());
    }
}
