//! Idle gate.
//!
//! A worker may not go idle while the host's task list still shows it
//! holding an `in_progress` task. The gate is pure: it reads the event and
//! the execution flag and nothing else.

use super::Decision;
use super::event::{first_field, first_str};
use crate::config::Config;
use crate::context::ProjectContext;
use serde_json::Value;

/// Task status that keeps a worker from idling.
pub const IN_PROGRESS_STATUS: &str = "in_progress";

/// Decide whether a worker may go idle.
pub fn evaluate(ctx: &ProjectContext, config: &Config, event: &Value) -> Decision {
    if !super::coordination_active(ctx, config) {
        return Decision::Allow;
    }

    let Some(worker) = first_str(event, &["teammate_name", "agent_name"]) else {
        tracing::debug!("idle event without a worker name");
        return Decision::Allow;
    };

    let tasks = match first_field(event, &["tasks", "task_list"]) {
        Some(Value::Array(tasks)) if !tasks.is_empty() => tasks,
        _ => {
            tracing::debug!(worker, "idle event without a task list");
            return Decision::Allow;
        }
    };

    let incomplete: Vec<String> = tasks
        .iter()
        .filter(|task| task.get("owner").and_then(Value::as_str) == Some(worker))
        .filter(|task| task.get("status").and_then(Value::as_str) == Some(IN_PROGRESS_STATUS))
        .map(task_label)
        .collect();

    if incomplete.is_empty() {
        return Decision::Allow;
    }

    tracing::debug!(worker, count = incomplete.len(), "blocking idle with in-progress tasks");
    Decision::Block(format!(
        "You have an incomplete task. Please finish or report a blocker before going idle.\n\
         In-progress tasks: {}",
        incomplete.join(", ")
    ))
}

/// Display label: `subject`, else `name`, else `id`.
fn task_label(task: &Value) -> String {
    ["subject", "name"]
        .iter()
        .filter_map(|key| task.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| match task.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "(unnamed task)".to_string())
}
