use crate::context::{PLAN_FILE, ProjectContext};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A temporary project whose state document says coordination is active
/// for phase 1.
pub(crate) fn create_executing_project() -> (TempDir, ProjectContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = ProjectContext::resolve_from(temp_dir.path());
    write_state(
        &ctx,
        serde_json::json!({
            "phase_status": "executing",
            "current_phase": 1,
            "project_name": "test-project"
        }),
    );
    (temp_dir, ctx)
}

pub(crate) fn write_state(ctx: &ProjectContext, state: Value) {
    std::fs::create_dir_all(&ctx.planning_dir).unwrap();
    std::fs::write(
        ctx.state_path(),
        serde_json::to_string_pretty(&state).unwrap(),
    )
    .unwrap();
}

/// Write `PLAN.md` into `.planning/phases/{phase_dir}/`.
pub(crate) fn write_plan(ctx: &ProjectContext, phase_dir: &str, content: &str) -> PathBuf {
    let dir = ctx.phases_dir().join(phase_dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(PLAN_FILE);
    std::fs::write(&path, content).unwrap();
    path
}

/// Raw entries of the file-touch log, one per line.
pub(crate) fn read_touches(ctx: &ProjectContext) -> Vec<Value> {
    match std::fs::read_to_string(ctx.touches_path()) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect(),
        Err(_) => Vec::new(),
    }
}
