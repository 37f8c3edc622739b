//! Tolerant serde helpers for persisted page documents.
//!
//! Stored documents come from database columns, AI drafts and hand-edited
//! imports, so any field may be missing or carry the wrong JSON type. These
//! `deserialize_with` helpers never fail on type mismatches: they degrade to
//! the field's default (or skip the offending collection entry) and log a
//! warning.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Accept a string, stringify numbers and booleans, default everything else.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value).unwrap_or_default())
}

/// Like [`string`], but `null` and non-scalar values become `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

/// Accept a JSON object, anything else becomes an empty map.
pub fn map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(obj) => obj,
        _ => Map::new(),
    })
}

/// Like [`map`], but non-objects become `None`.
pub fn opt_map<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(obj) => Some(obj),
        _ => None,
    })
}

/// Object of scalar values, stringified. Non-scalar entries are dropped.
pub fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(obj) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(obj
        .iter()
        .filter_map(|(key, val)| value_to_string(val).map(|s| (key.clone(), s)))
        .collect())
}

/// Deserialize an array, skipping entries that cannot be parsed.
/// Non-arrays become an empty vector.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_seq(value))
}

/// Like [`seq`], but a missing array (`null` or wrong type) becomes `None`.
pub fn opt_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_array() {
        return Ok(None);
    }
    Ok(Some(parse_seq(value)))
}

/// Fall back to `T::default()` when the value does not parse as `T`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_or_default(value))
}

/// Parse any JSON value as `T`, substituting the default on failure.
pub fn from_value_or_default<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "Malformed document field replaced with default");
            T::default()
        }
    }
}

/// Render a scalar JSON value as a string. Objects, arrays and `null` yield `None`.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_seq<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(index, error = %err, "Skipping malformed document entry");
                None
            }
        })
        .collect()
}
