//! Loose conversions for raw JSON property values.
//!
//! The remote service is inconsistent about scalar types (booleans arrive as
//! `"true"`, ids as numbers), so setters coerce rather than reject.

use serde::de::DeserializeOwned;
use serde_json::Value;

use edgemgmt_client::{ApiError, Result};

pub(crate) fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

pub(crate) fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn as_opt_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(as_string(v)),
    }
}

/// Decode `value` into `T`, reporting `source` as the origin on failure.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, source: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        url: source.to_string(),
        source: e,
    })
}

/// Entries of `value[key]` when it is an array; empty otherwise.
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}
