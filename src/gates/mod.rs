//! Allow/block gates for host-intercepted worker actions.
//!
//! Each gate consumes one event and answers with a [`Decision`]. Transport
//! (reading stdin, mapping a block to exit status 2) lives in the command
//! layer; the gates themselves only read the workspace.
//!
//! Every gate starts by asking the state store whether coordination is
//! active. When it is not, the gate allows without reading anything else.

pub mod completion;
pub mod event;
pub mod idle;
pub mod write;

use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::{GmsdError, Result};
use crate::state::StateStore;

/// Verdict of a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Refuse the action; the message is shown to the worker.
    Block(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block(_))
    }

    /// Block message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Block(message) => Some(message),
        }
    }

    /// Convert to the command-layer result: a block becomes `Blocked`.
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Block(message) => Err(GmsdError::Blocked(message)),
        }
    }
}

/// Whether the state document says coordination is active.
pub fn coordination_active(ctx: &ProjectContext, config: &Config) -> bool {
    let active = StateStore::for_project(ctx).is_execution_active(&config.active_status);
    if !active {
        tracing::debug!("coordination inactive; gate allows");
    }
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_executing_project, write_state};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_decision_into_result() {
        assert!(Decision::Allow.into_result().is_ok());

        let err = Decision::Block("nope".to_string()).into_result().unwrap_err();
        assert!(matches!(err, GmsdError::Blocked(ref msg) if msg == "nope"));
    }

    #[test]
    fn test_decision_accessors() {
        let block = Decision::Block("owned".to_string());
        assert!(block.is_block());
        assert!(!block.is_allow());
        assert_eq!(block.message(), Some("owned"));
        assert_eq!(Decision::Allow.message(), None);
    }

    #[test]
    fn test_coordination_active_follows_phase_status() {
        let (_temp_dir, ctx) = create_executing_project();
        let config = Config::default();
        assert!(coordination_active(&ctx, &config));

        write_state(&ctx, json!({"phase_status": "planning"}));
        assert!(!coordination_active(&ctx, &config));

        write_state(&ctx, json!({"current_phase": 1}));
        assert!(!coordination_active(&ctx, &config));
    }

    #[test]
    fn test_coordination_inactive_without_or_with_corrupt_state() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ProjectContext::resolve_from(temp_dir.path());
        let config = Config::default();
        assert!(!coordination_active(&ctx, &config));

        std::fs::create_dir_all(&ctx.planning_dir).unwrap();
        std::fs::write(ctx.state_path(), "{ not json").unwrap();
        assert!(!coordination_active(&ctx, &config));
    }

    #[test]
    fn test_coordination_active_uses_configured_sentinel() {
        let (_temp_dir, ctx) = create_executing_project();
        write_state(&ctx, json!({"phase_status": "running"}));

        let config = Config {
            active_status: "running".to_string(),
            ..Config::default()
        };
        assert!(coordination_active(&ctx, &config));
        assert!(!coordination_active(&ctx, &Config::default()));
    }
}
