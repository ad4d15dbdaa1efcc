//! Command implementations for gmsd.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod hook;
mod state;

use crate::cli::Command;
use crate::error::Result;

pub use hook::cmd_hook;
pub use state::cmd_state;

/// Dispatch a command to its implementation.
///
/// This is the main entry point for command execution. Each command
/// is routed to its handler function.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::State(state_cmd) => cmd_state(state_cmd),
        Command::Hook(hook_cmd) => cmd_hook(hook_cmd),
    }
}
