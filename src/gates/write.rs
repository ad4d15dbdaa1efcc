//! Write interceptor.
//!
//! Runs before a worker's file-mutating tool executes. Every attempt that
//! names a target file is recorded in the touch log; the attempt is blocked
//! only when the plan assigns the file to a different task than the one the
//! worker is on. Missing information anywhere along the way allows.

use super::Decision;
use super::event::{first_field, first_str};
use crate::config::Config;
use crate::context::ProjectContext;
use crate::ownership::{extract_task_number, normalize_path, resolve_ownership};
use crate::state::StateStore;
use crate::touches::{FileTouch, record_touch};
use serde_json::Value;

/// Worker name used when the event does not identify one.
pub const UNKNOWN_AGENT: &str = "unknown";

/// The fields of a mutation-intent event the gate looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteIntent {
    pub tool: String,
    pub file_path: Option<String>,
    pub agent: String,
    pub current_task: Option<String>,
}

impl WriteIntent {
    pub fn from_event(event: &Value) -> Self {
        let tool = first_str(event, &["tool_name"]).unwrap_or_default().to_string();

        let file_path = first_field(event, &["tool_input", "input"])
            .and_then(|input| first_str(input, &["file_path", "path"]))
            .map(str::to_string);

        let agent = first_str(event, &["agent_name", "teammate_name"])
            .unwrap_or(UNKNOWN_AGENT)
            .to_string();

        let current_task = first_str(event, &["current_task", "task_subject"])
            .map(str::to_string);

        Self {
            tool,
            file_path,
            agent,
            current_task,
        }
    }
}

/// Decide whether a mutation may proceed.
pub fn evaluate(ctx: &ProjectContext, config: &Config, event: &Value) -> Decision {
    if !super::coordination_active(ctx, config) {
        return Decision::Allow;
    }

    let intent = WriteIntent::from_event(event);
    if !config.is_mutating_tool(&intent.tool) {
        tracing::debug!(tool = %intent.tool, "tool does not mutate files");
        return Decision::Allow;
    }

    let Some(file_path) = intent.file_path.as_deref() else {
        tracing::debug!("mutation event without a target path");
        return Decision::Allow;
    };

    record_touch(
        ctx,
        &FileTouch::new(file_path, intent.agent.as_str(), intent.tool.as_str()),
    );

    let store = StateStore::for_project(ctx);
    let Some(ownership) = resolve_ownership(ctx, &store) else {
        return Decision::Allow;
    };

    let Some(owner) = ownership.find_owner(file_path, &ctx.root) else {
        tracing::debug!(file = file_path, "file is not declared in the plan");
        return Decision::Allow;
    };

    let Some(current_task) = intent.current_task.as_deref() else {
        tracing::debug!(file = file_path, owner, "worker did not report a current task");
        return Decision::Allow;
    };

    let (Some(owner_number), Some(current_number)) =
        (extract_task_number(owner), extract_task_number(current_task))
    else {
        return Decision::Allow;
    };

    if owner_number == current_number {
        return Decision::Allow;
    }

    let normalized = normalize_path(file_path, Some(&ctx.root));
    tracing::debug!(
        file = %normalized,
        owner,
        current_task,
        agent = %intent.agent,
        "blocking write to file owned by another task"
    );
    Decision::Block(format!(
        "File {} is owned by {}. Coordinate before modifying.",
        normalized, owner
    ))
}
