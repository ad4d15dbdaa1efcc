//! Atomic state store for `.planning/state.json`.
//!
//! The shared state document is read and mutated by every worker process.
//! There is no lock manager: each mutation reads the whole document, applies
//! one change, stamps `last_updated`, and replaces the file through
//! [`crate::fs::atomic_write_file`]. Readers therefore always see a complete
//! document. Two mutations racing on the same key resolve as
//! last-rename-wins; lost updates under a true race are accepted.

mod keypath;


pub use keypath::parse_key_path;

use crate::context::ProjectContext;
use crate::error::{GmsdError, Result};
use crate::fs::atomic_write_file;
use chrono::{SecondsFormat, Utc};
use keypath::{get_nested, get_nested_mut, set_nested, type_name};
use serde_json::{Number, Value};
use std::path::{Path, PathBuf};

/// Field stamped on every successful mutation.
pub const LAST_UPDATED_FIELD: &str = "last_updated";

/// Field holding the execution-active flag.
pub const PHASE_STATUS_FIELD: &str = "phase_status";

/// Field identifying the phase whose plan is in force.
pub const CURRENT_PHASE_FIELD: &str = "current_phase";

/// Handle on the shared state document.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by an explicit file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store for a project's `.planning/state.json`.
    pub fn for_project(ctx: &ProjectContext) -> Self {
        Self::new(ctx.state_path())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document.
    ///
    /// A missing, unparseable, or non-object document is reported as
    /// `NotFound`.
    pub fn load(&self) -> Result<Value> {
        if !self.path.exists() {
            return Err(GmsdError::NotFound(format!(
                "State file not found: {}",
                self.path.display()
            )));
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            GmsdError::NotFound(format!(
                "failed to read state file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let doc: Value = serde_json::from_str(&content).map_err(|e| {
            GmsdError::NotFound(format!("Invalid JSON in state file: {}", e))
        })?;

        if !doc.is_object() {
            return Err(GmsdError::NotFound(format!(
                "State file is not a JSON object: {}",
                self.path.display()
            )));
        }

        Ok(doc)
    }

    /// Read the document, treating any failure as "no state".
    pub fn load_lenient(&self) -> Option<Value> {
        match self.load() {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(error = %e, "state document unavailable");
                None
            }
        }
    }

    /// Return the value at a dot-separated key path.
    pub fn get(&self, key_path: &str) -> Result<Value> {
        let segments = parse_key_path(key_path)?;
        let doc = self.load()?;

        get_nested(&doc, &segments)
            .cloned()
            .ok_or_else(|| GmsdError::NotFound(format!("Field not found: {}", key_path)))
    }

    /// Set the value at a key path, creating intermediate objects as needed.
    pub fn patch(&self, key_path: &str, value: Value) -> Result<()> {
        let segments = parse_key_path(key_path)?;
        let mut doc = self.load()?;

        set_nested(&mut doc, &segments, value)?;
        self.persist(doc)?;

        tracing::debug!(key = key_path, "patched state");
        Ok(())
    }

    /// Push a value onto the array at a key path.
    pub fn append(&self, key_path: &str, value: Value) -> Result<()> {
        let segments = parse_key_path(key_path)?;
        let mut doc = self.load()?;

        match get_nested_mut(&mut doc, &segments) {
            Some(Value::Array(items)) => items.push(value),
            other => {
                return Err(GmsdError::TypeMismatch {
                    path: key_path.to_string(),
                    expected: "an array",
                    found: type_name(other.map(|v| &*v)),
                });
            }
        }
        self.persist(doc)?;

        tracing::debug!(key = key_path, "appended to state");
        Ok(())
    }

    /// Add one to the number at a key path and return the new value.
    pub fn increment(&self, key_path: &str) -> Result<Value> {
        let segments = parse_key_path(key_path)?;
        let mut doc = self.load()?;

        let slot = get_nested_mut(&mut doc, &segments);
        let next = match slot.as_deref() {
            Some(Value::Number(n)) => increment_number(n).ok_or_else(|| {
                GmsdError::UserError(format!("Field \"{}\" cannot be incremented: {}", key_path, n))
            })?,
            other => {
                return Err(GmsdError::TypeMismatch {
                    path: key_path.to_string(),
                    expected: "a number",
                    found: type_name(other),
                });
            }
        };

        if let Some(slot) = slot {
            *slot = Value::Number(next.clone());
        }
        self.persist(doc)?;

        tracing::debug!(key = key_path, value = %next, "incremented state");
        Ok(Value::Number(next))
    }

    /// Whether the execution-active flag equals `active_status`.
    ///
    /// Missing or corrupt documents count as inactive.
    pub fn is_execution_active(&self, active_status: &str) -> bool {
        self.load_lenient()
            .and_then(|doc| {
                doc.get(PHASE_STATUS_FIELD)
                    .and_then(Value::as_str)
                    .map(|status| status == active_status)
            })
            .unwrap_or(false)
    }

    /// The current phase identifier, if the document names one.
    ///
    /// Numbers and non-empty strings are accepted.
    pub fn current_phase(&self) -> Option<String> {
        let doc = self.load_lenient()?;
        match doc.get(CURRENT_PHASE_FIELD)? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Stamp `last_updated` and atomically replace the document.
    fn persist(&self, mut doc: Value) -> Result<()> {
        if let Value::Object(map) = &mut doc {
            map.insert(
                LAST_UPDATED_FIELD.to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }

        let mut content = serde_json::to_string_pretty(&doc).map_err(|e| {
            GmsdError::UserError(format!("failed to serialize state document: {}", e))
        })?;
        content.push('\n');

        atomic_write_file(&self.path, &content)
    }
}

/// Interpret a raw CLI argument as JSON, falling back to a plain string.
///
/// `3` becomes a number, `true` a boolean, `{"a":1}` an object, while
/// `executing` stays the string `"executing"`.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn increment_number(n: &Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        return i.checked_add(1).map(Number::from);
    }
    if let Some(u) = n.as_u64() {
        return u.checked_add(1).map(Number::from);
    }
    n.as_f64().and_then(|f| Number::from_f64(f + 1.0))
}
