//! Typed access to fields of store responses.

use serde_json::Value;

use crate::{Error, Result};

/// Field lookup helpers for JSON values returned by the store.
///
/// Paths are dot-separated field names (`"data.name"`). A field holding
/// `null` is treated the same as a missing field.
pub trait ValueExt {
    /// Returns the value at `path`, if present and not `null`.
    fn at(&self, path: &str) -> Option<&Value>;

    /// Returns the boolean at `path` or a malformed-response error.
    fn require_bool(&self, path: &str) -> Result<bool> {
        self.at(path)
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::malformed(path, "boolean"))
    }

    /// Returns the string at `path` or a malformed-response error.
    fn require_str(&self, path: &str) -> Result<&str> {
        self.at(path)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed(path, "string"))
    }

    /// Returns the array at `path` or a malformed-response error.
    fn require_array(&self, path: &str) -> Result<&[Value]> {
        self.at(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::malformed(path, "array"))
    }
}

impl ValueExt for Value {
    fn at(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |current, segment| current.get(segment))
            .filter(|value| !value.is_null())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nested_lookup() {
        let value = json!({"data": {"name": "Beverages", "categoryID": 1}});

        assert_eq!(value.require_str("data.name").unwrap(), "Beverages");
        assert_eq!(value.at("data.categoryID"), Some(&json!(1)));
        assert!(value.at("data.missing").is_none());
    }

    #[test]
    fn test_null_is_absent() {
        let value = json!({"after": null});
        assert!(value.at("after").is_none());
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let value = json!({"active": "yes", "data": {}});

        let error = value.require_bool("active").unwrap_err();
        assert!(error.is_malformed());

        let error = value.require_array("data").unwrap_err();
        assert!(matches!(
            error,
            Error::MalformedResponse { ref path, ref expected } if path == "data" && expected == "array"
        ));
    }
}
