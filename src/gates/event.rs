//! Hook event parsing.
//!
//! Hosts send the event as a JSON object on stdin. Field names arrive either
//! in snake_case or camelCase, and different host versions use different
//! aliases for the same concept, so every lookup takes a list of candidate
//! keys and tries both spellings of each.

use serde_json::Value;

/// Parse raw stdin into an event object.
///
/// Empty input, invalid JSON, and non-object JSON all yield `None`; callers
/// treat that as "nothing to decide" and allow.
pub fn parse_event(input: &str) -> Option<Value> {
    if input.trim().is_empty() {
        tracing::debug!("empty hook input");
        return None;
    }

    match serde_json::from_str::<Value>(input) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            tracing::debug!("hook input is not a JSON object");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "hook input is not valid JSON");
            None
        }
    }
}

/// Look up a field by its snake_case key, falling back to camelCase.
pub fn field<'a>(v: &'a Value, snake_key: &str) -> Option<&'a Value> {
    v.get(snake_key)
        .or_else(|| v.get(snake_to_camel(snake_key).as_str()))
}

/// First non-null field among `keys`.
pub fn first_field<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| field(v, key))
        .find(|value| !value.is_null())
}

/// First non-empty string field among `keys`.
pub fn first_str<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| field(v, key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

pub fn snake_to_camel(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for ch in s.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}
