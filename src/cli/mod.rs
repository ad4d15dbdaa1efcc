//! CLI argument parsing for gmsd.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};

/// gmsd: coordination layer for multiple agents sharing one planning workspace.
///
/// All state lives under `.planning/` in the current directory:
/// - `state.json` is the shared state document
/// - `phases/<n>-<slug>/PLAN.md` declares which task owns which file
/// - `file-touches.ndjson` records every attempted file mutation
#[derive(Parser, Debug)]
#[command(name = "gmsd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Diagnostic log level (overridden by the GMSD_LOG environment variable).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for gmsd.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read or mutate the shared state document.
    ///
    /// Fields are addressed with dot-separated key paths such as
    /// `metrics.total_tasks_completed`.
    State(StateCommand),

    /// Run a coordination gate for a host hook event.
    ///
    /// The event is read as JSON from stdin. Exit status 0 allows the
    /// action, 2 blocks it (reason on stderr), 1 is an internal error.
    Hook(HookCommand),
}

/// Arguments for the `state` command.
#[derive(Parser, Debug)]
pub struct StateCommand {
    #[command(subcommand)]
    pub action: StateAction,
}

/// Available state actions.
#[derive(Subcommand, Debug)]
pub enum StateAction {
    /// Print the value at a key path as JSON.
    Get {
        /// Dot-separated key path.
        path: String,
    },

    /// Set the value at a key path, creating intermediate objects.
    ///
    /// The value is parsed as JSON when possible, otherwise stored as a string.
    Patch {
        /// Dot-separated key path.
        path: String,

        /// New value.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Append a value to the array at a key path.
    Append {
        /// Dot-separated key path.
        path: String,

        /// Value to append.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Add one to the number at a key path.
    Increment {
        /// Dot-separated key path.
        path: String,
    },
}

/// Arguments for the `hook` command.
#[derive(Parser, Debug)]
pub struct HookCommand {
    /// Which gate to run.
    #[arg(value_enum)]
    pub kind: HookKind,
}

/// Gates a host can invoke.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    /// Before a file-mutating tool runs: record the touch, check ownership.
    FileTracker,

    /// Before a worker goes idle: check for in-progress tasks.
    TeammateIdle,

    /// When a task is marked complete: run test and lint checks.
    TaskCompleted,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_state_get() {
        let cli = Cli::try_parse_from(["gmsd", "state", "get", "metrics.total"]).unwrap();
        assert_eq!(cli.log_level, "warn");
        if let Command::State(state_cmd) = cli.command {
            if let StateAction::Get { path } = state_cmd.action {
                assert_eq!(path, "metrics.total");
            } else {
                panic!("Expected Get action");
            }
        } else {
            panic!("Expected State command");
        }
    }

    #[test]
    fn parse_state_patch_with_negative_value() {
        let cli = Cli::try_parse_from(["gmsd", "state", "patch", "offset", "-1"]).unwrap();
        if let Command::State(state_cmd) = cli.command {
            if let StateAction::Patch { path, value } = state_cmd.action {
                assert_eq!(path, "offset");
                assert_eq!(value, "-1");
            } else {
                panic!("Expected Patch action");
            }
        } else {
            panic!("Expected State command");
        }
    }

    #[test]
    fn parse_state_append_and_increment() {
        let cli = Cli::try_parse_from(["gmsd", "state", "append", "completed_phases", "1"])
            .unwrap();
        if let Command::State(state_cmd) = cli.command {
            assert!(matches!(state_cmd.action, StateAction::Append { .. }));
        } else {
            panic!("Expected State command");
        }

        let cli = Cli::try_parse_from(["gmsd", "state", "increment", "metrics.tasks"]).unwrap();
        if let Command::State(state_cmd) = cli.command {
            assert!(matches!(state_cmd.action, StateAction::Increment { .. }));
        } else {
            panic!("Expected State command");
        }
    }

    #[test]
    fn parse_state_patch_requires_value() {
        assert!(Cli::try_parse_from(["gmsd", "state", "patch", "phase_status"]).is_err());
    }

    #[test]
    fn parse_hook_kinds() {
        for (arg, kind) in [
            ("file-tracker", HookKind::FileTracker),
            ("teammate-idle", HookKind::TeammateIdle),
            ("task-completed", HookKind::TaskCompleted),
        ] {
            let cli = Cli::try_parse_from(["gmsd", "hook", arg]).unwrap();
            if let Command::Hook(hook_cmd) = cli.command {
                assert_eq!(hook_cmd.kind, kind);
            } else {
                panic!("Expected Hook command");
            }
        }
    }

    #[test]
    fn parse_hook_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["gmsd", "hook", "pre-commit"]).is_err());
    }

    #[test]
    fn parse_global_log_level() {
        let cli = Cli::try_parse_from(["gmsd", "hook", "file-tracker", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, "debug");
    }
}
