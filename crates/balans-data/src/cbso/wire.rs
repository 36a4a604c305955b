//! Helpers for the loosely typed registry JSON.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Remove a registry taxonomy prefix such as `pcd:m`, `cty:m` or `lgf:m`.
///
/// Codes arrive as `cty:mBE` or `lgf:m610`; the prefix is three lowercase
/// letters, a colon and `m`.
pub(crate) fn strip_taxonomy_prefix(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() > 5
        && bytes[..3].iter().all(u8::is_ascii_lowercase)
        && bytes[3] == b':'
        && bytes[4] == b'm'
    {
        &value[5..]
    } else {
        value
    }
}

/// Parse a registry date. Accepts `YYYY-MM-DD` optionally followed by a time.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Render a scalar or flat object as display text.
///
/// Objects are flattened by joining their non-null scalar values with a
/// space, each stripped of its taxonomy prefix.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => strip_taxonomy_prefix(s.trim()).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map
            .values()
            .filter_map(text_of)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Array(items) => items
            .iter()
            .filter_map(text_of)
            .collect::<Vec<_>>()
            .join(" "),
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a numeric JSON value that may be encoded as a string.
pub(crate) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserialize any JSON value into optional display text.
pub(crate) fn de_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_of))
}

/// Deserialize a number or numeric string.
pub(crate) fn de_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// Convert a value, reading an unexpected shape as absent.
pub(crate) fn lenient<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(
                expected = std::any::type_name::<T>(),
                error = %err,
                "ignoring value of unexpected shape"
            );
            None
        }
    }
}

/// Convert a list entry by entry. Entries of an unexpected shape are dropped
/// and a lone object counts as a one-entry list.
pub(crate) fn entries<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };
    items.into_iter().filter_map(lenient).collect()
}

/// Read an object-shaped section. Anything else is logged and dropped.
pub(crate) fn section<T: DeserializeOwned>(value: Value, name: &str) -> Option<T> {
    match value {
        Value::Null => None,
        Value::Object(_) => lenient(value),
        other => {
            tracing::warn!(section = name, found = %shape(&other), "ignoring section of unexpected shape");
            None
        }
    }
}

/// Read a list-shaped section entry by entry. Scalars are logged and dropped.
pub(crate) fn section_entries<T: DeserializeOwned>(value: Value, name: &str) -> Option<Vec<T>> {
    match value {
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => Some(entries(value)),
        other => {
            tracing::warn!(section = name, found = %shape(&other), "ignoring section of unexpected shape");
            None
        }
    }
}

const fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deserialize a nested object, reading an unexpected shape as `None`.
pub(crate) fn de_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(lenient))
}

/// Deserialize a list entry by entry; see [`entries`].
pub(crate) fn de_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(entries).unwrap_or_default())
}
