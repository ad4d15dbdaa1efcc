//! File-touch recording for gmsd.
//!
//! Every mutation a worker attempts while coordination is active is appended
//! to `.planning/file-touches.ndjson`, one JSON object per line, whether the
//! write gate allowed it or not. The log is the audit trail a human uses to
//! review ownership conflicts the gate could not decide.
//!
//! # Record Format
//!
//! - `file`: path exactly as the tool reported it
//! - `agent`: worker name (`unknown` when the host did not say)
//! - `tool`: tool name (`Write`, `Edit`, ...)
//! - `timestamp`: RFC3339 timestamp
//!
//! Appends use `O_APPEND`, so concurrent workers never truncate each other's
//! entries and a damaged line never affects later appends.

use crate::context::ProjectContext;
use crate::error::{GmsdError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;

/// One attempted file mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTouch {
    pub file: String,
    pub agent: String,
    pub tool: String,
    pub timestamp: DateTime<Utc>,
}

impl FileTouch {
    /// Create a touch stamped with the current time.
    pub fn new(file: impl Into<String>, agent: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            agent: agent.into(),
            tool: tool.into(),
            timestamp: Utc::now(),
        }
    }

    /// Serialize the touch to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            GmsdError::UserError(format!("failed to serialize file touch to JSON: {}", e))
        })
    }
}

/// Record a touch, logging and swallowing any failure.
///
/// Telemetry must never be the reason a worker gets blocked.
pub fn record_touch(ctx: &ProjectContext, touch: &FileTouch) {
    match append_touch(ctx, touch) {
        Ok(()) => tracing::debug!(file = %touch.file, agent = %touch.agent, "recorded file touch"),
        Err(e) => tracing::warn!(error = %e, file = %touch.file, "failed to record file touch"),
    }
}

/// Append a touch to the log, creating `.planning/` and the log if absent.
pub fn append_touch(ctx: &ProjectContext, touch: &FileTouch) -> Result<()> {
    let touches_file = ctx.touches_path();
    let json_line = touch.to_ndjson_line()?;

    if !ctx.planning_dir.exists() {
        fs::create_dir_all(&ctx.planning_dir).map_err(|e| {
            GmsdError::UserError(format!(
                "failed to create planning directory '{}': {}",
                ctx.planning_dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&touches_file)
        .map_err(|e| {
            GmsdError::UserError(format!(
                "failed to open file-touch log '{}': {}",
                touches_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        GmsdError::UserError(format!(
            "failed to write file touch to '{}': {}",
            touches_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        GmsdError::UserError(format!(
            "failed to sync file-touch log '{}': {}",
            touches_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Read every well-formed entry of the log, oldest first.
///
/// A missing log is empty. Lines that do not parse are skipped.
pub fn load_touches(ctx: &ProjectContext) -> Result<Vec<FileTouch>> {
    let touches_file = ctx.touches_path();
    if !touches_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&touches_file).map_err(|e| {
        GmsdError::UserError(format!(
            "failed to read file-touch log '{}': {}",
            touches_file.display(),
            e
        ))
    })?;

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(touch) => Some(touch),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed file-touch entry");
                None
            }
        })
        .collect())
}
