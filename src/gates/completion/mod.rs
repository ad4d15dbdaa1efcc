//! Task-completion gate.
//!
//! Before a task may be marked done, the project's test command and then its
//! lint command run in the project root. A failing check blocks completion
//! and quotes the start of its output. A check that cannot run, or runs past
//! the timeout, is an internal error rather than a block.

pub mod detect;
pub mod runner;

pub use detect::{detect_lint_command, detect_test_command};
pub use runner::{CommandOutcome, run_command};

use super::Decision;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use std::time::Duration;

const TEST_FAILURE_HEADER: &str = "Tests failing after task completion. Fix before marking done.";
const LINT_FAILURE_HEADER: &str = "Lint errors found. Fix before marking done.";

/// Run the detected checks and decide whether the task may complete.
pub fn evaluate(ctx: &ProjectContext, config: &Config) -> Result<Decision> {
    if !super::coordination_active(ctx, config) {
        return Ok(Decision::Allow);
    }

    let checks = [
        (
            detect::resolve_command(config.test_command.as_deref(), || {
                detect_test_command(&ctx.root)
            }),
            TEST_FAILURE_HEADER,
        ),
        (
            detect::resolve_command(config.lint_command.as_deref(), || {
                detect_lint_command(&ctx.root)
            }),
            LINT_FAILURE_HEADER,
        ),
    ];

    let timeout = Duration::from_secs(config.completion_timeout_secs);
    for (command, header) in checks {
        let Some(command) = command else {
            continue;
        };

        let outcome = run_command(&command, &ctx.root, timeout)?;
        if !outcome.is_success() {
            tracing::debug!(command = %command, exit_code = ?outcome.exit_code, "check failed");
            return Ok(Decision::Block(failure_message(
                header,
                &command,
                outcome.diagnostic_output(),
                config.output_excerpt_chars,
            )));
        }
    }

    Ok(Decision::Allow)
}

fn failure_message(header: &str, command: &str, output: &str, excerpt_chars: usize) -> String {
    let excerpt: String = output.chars().take(excerpt_chars).collect();
    format!("{}\nCommand: {}\n{}", header, command, excerpt)
}
