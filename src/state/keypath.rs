//! Dot-separated key path traversal over JSON values.
//!
//! Objects are addressed by key. Arrays are addressed by decimal index when
//! the segment parses as one (`history.0.phase`).

use crate::error::{GmsdError, Result};
use serde_json::{Map, Value};

/// Split a key path into segments, rejecting empty paths and empty segments.
pub fn parse_key_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(GmsdError::UserError("key path must not be empty".to_string()));
    }

    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(GmsdError::UserError(format!(
            "invalid key path '{}': segments must not be empty",
            path
        )));
    }

    Ok(segments)
}

/// Look up the value at `segments`, or `None` if any segment is absent.
pub fn get_nested<'a>(doc: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(doc, |current, key| step(current, key))
}

/// Mutable lookup of the value at `segments`.
pub fn get_nested_mut<'a>(doc: &'a mut Value, segments: &[&str]) -> Option<&'a mut Value> {
    let mut current = doc;
    for key in segments {
        current = match current {
            Value::Object(map) => map.get_mut(*key)?,
            Value::Array(items) => items.get_mut(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set the value at `segments`, creating intermediate objects as needed.
///
/// An intermediate that is neither an object nor an array is replaced with
/// an empty object. A segment below an array must be an in-range index at
/// any depth; anything else is an error and the document is left alone.
pub fn set_nested(doc: &mut Value, segments: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(GmsdError::UserError("key path must not be empty".to_string()));
    };

    let mut current = doc;
    for key in parents {
        if let Some(i) = array_index(current, key) {
            current = &mut current[i];
            continue;
        }
        if let Value::Array(items) = &*current {
            return Err(not_an_index(segments, key, items.len()));
        }

        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = &mut current[*key];
        if !current.is_object() && !current.is_array() {
            *current = Value::Object(Map::new());
        }
    }

    if let Some(i) = array_index(current, last) {
        current[i] = value;
    } else if let Value::Array(items) = current {
        return Err(not_an_index(segments, last, items.len()));
    } else {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current[*last] = value;
    }

    Ok(())
}

fn not_an_index(segments: &[&str], key: &str, len: usize) -> GmsdError {
    GmsdError::UserError(format!(
        "cannot set '{}': '{}' is not an index within an array of length {}",
        segments.join("."),
        key,
        len
    ))
}

/// Human-readable JSON type name for error messages.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// In-range index when `value` is an array and `key` is a decimal index.
fn array_index(value: &Value, key: &str) -> Option<usize> {
    match value {
        Value::Array(items) => key.parse::<usize>().ok().filter(|i| *i < items.len()),
        _ => None,
    }
}

fn step<'a>(current: &'a Value, key: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => items.get(key.parse::<usize>().ok()?),
        _ => None,
    }
}
