//! Implementation of the `gmsd hook` command.
//!
//! Reads one event from stdin, runs the requested gate against the project
//! in the current directory, and turns the verdict into an exit status. A
//! missing or unreadable event is treated as nothing to decide.

use crate::cli::{HookCommand, HookKind};
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::gates::event::{first_str, parse_event};
use crate::gates::{self, Decision};
use std::io::Read;

/// Execute the `gmsd hook` command.
pub fn cmd_hook(hook_cmd: HookCommand) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let input = read_stdin();
    run_hook(hook_cmd.kind, &ctx, &input)
}

/// Run a gate on raw event text.
pub fn run_hook(kind: HookKind, ctx: &ProjectContext, input: &str) -> Result<()> {
    let config = Config::load_or_default(ctx);
    let event = parse_event(input);

    let decision = match kind {
        HookKind::FileTracker => match &event {
            Some(event) => gates::write::evaluate(ctx, &config, event),
            None => Decision::Allow,
        },
        HookKind::TeammateIdle => match &event {
            Some(event) => gates::idle::evaluate(ctx, &config, event),
            None => Decision::Allow,
        },
        HookKind::TaskCompleted => {
            if let Some(subject) = event
                .as_ref()
                .and_then(|event| first_str(event, &["task_subject", "subject"]))
            {
                tracing::debug!(task = subject, "task completed");
            }
            gates::completion::evaluate(ctx, &config)?
        }
    };

    decision.into_result()
}

fn read_stdin() -> String {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        tracing::debug!(error = %e, "failed to read hook input");
        input.clear();
    }
    input
}
