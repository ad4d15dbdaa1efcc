//! Implementation of the `gmsd state` command.
//!
//! Thin CLI surface over [`crate::state::StateStore`] for the shared state
//! document of the project in the current directory.

use crate::cli::{StateAction, StateCommand};
use crate::context::ProjectContext;
use crate::error::{GmsdError, Result};
use crate::state::{StateStore, parse_value};
use serde_json::Value;

/// Execute the `gmsd state` command.
pub fn cmd_state(state_cmd: StateCommand) -> Result<()> {
    let ctx = ProjectContext::resolve()?;
    let store = StateStore::for_project(&ctx);

    match state_cmd.action {
        StateAction::Get { path } => {
            let value = store.get(&path)?;
            println!("{}", to_pretty_json(&value)?);
        }
        StateAction::Patch { path, value } => store.patch(&path, parse_value(&value))?,
        StateAction::Append { path, value } => store.append(&path, parse_value(&value))?,
        StateAction::Increment { path } => {
            store.increment(&path)?;
        }
    }

    Ok(())
}

fn to_pretty_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| GmsdError::UserError(format!("failed to serialize value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DirGuard, create_executing_project};
    use serial_test::serial;
    use tempfile::TempDir;

    fn run(action: StateAction) -> Result<()> {
        cmd_state(StateCommand { action })
    }

    #[test]
    #[serial]
    fn test_state_patch_then_get() {
        let (temp_dir, ctx) = create_executing_project();
        let _guard = DirGuard::new(temp_dir.path());

        run(StateAction::Patch {
            path: "metrics.total_tasks".to_string(),
            value: "3".to_string(),
        })
        .unwrap();
        run(StateAction::Get {
            path: "metrics.total_tasks".to_string(),
        })
        .unwrap();

        let store = StateStore::for_project(&ctx);
        assert_eq!(store.get("metrics.total_tasks").unwrap(), 3);
    }

    #[test]
    #[serial]
    fn test_state_append_and_increment() {
        let (temp_dir, ctx) = create_executing_project();
        let _guard = DirGuard::new(temp_dir.path());

        run(StateAction::Patch {
            path: "completed_phases".to_string(),
            value: "[]".to_string(),
        })
        .unwrap();
        run(StateAction::Append {
            path: "completed_phases".to_string(),
            value: "1".to_string(),
        })
        .unwrap();
        run(StateAction::Increment {
            path: "current_phase".to_string(),
        })
        .unwrap();

        let store = StateStore::for_project(&ctx);
        assert_eq!(store.get("completed_phases").unwrap(), serde_json::json!([1]));
        assert_eq!(store.get("current_phase").unwrap(), 2);
    }

    #[test]
    #[serial]
    fn test_state_plain_text_value_is_string() {
        let (temp_dir, ctx) = create_executing_project();
        let _guard = DirGuard::new(temp_dir.path());

        run(StateAction::Patch {
            path: "phase_status".to_string(),
            value: "verifying".to_string(),
        })
        .unwrap();

        let store = StateStore::for_project(&ctx);
        assert_eq!(store.get("phase_status").unwrap(), "verifying");
    }

    #[test]
    #[serial]
    fn test_state_errors_map_to_user_error_exit_code() {
        let (temp_dir, _ctx) = create_executing_project();
        let _guard = DirGuard::new(temp_dir.path());

        let err = run(StateAction::Get {
            path: "missing.field".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, GmsdError::NotFound(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::USER_ERROR);

        let err = run(StateAction::Increment {
            path: "project_name".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, GmsdError::TypeMismatch { found: "string", .. }));
    }

    #[test]
    #[serial]
    fn test_state_without_document_fails() {
        let temp_dir = TempDir::new().unwrap();
        let _guard = DirGuard::new(temp_dir.path());

        let err = run(StateAction::Get {
            path: "phase_status".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("State file not found"));
    }
}
