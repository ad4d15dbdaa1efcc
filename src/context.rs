//! Project context resolution for gmsd.
//!
//! Every gate and state operation locates the shared planning workspace
//! through this module, so all invocations agree on where `state.json`,
//! the file-touch log, and the phase plans live.

use crate::error::{GmsdError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Planning directory relative to the project root.
pub const PLANNING_DIR: &str = ".planning";

/// Shared state document file name.
pub const STATE_FILE: &str = "state.json";

/// File-touch log file name.
pub const TOUCHES_FILE: &str = "file-touches.ndjson";

/// Optional configuration file name.
pub const CONFIG_FILE: &str = "gmsd.yaml";

/// Phase directories live under this directory of the planning dir.
pub const PHASES_DIR: &str = "phases";

/// Plan document file name inside a phase directory.
pub const PLAN_FILE: &str = "PLAN.md";

/// Resolved paths for one project workspace.
///
/// All paths are derived from `root`; nothing is checked for existence at
/// resolution time because absence is a meaningful state for the gates.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root (the directory the host runs workers in).
    pub root: PathBuf,

    /// `{root}/.planning/`
    pub planning_dir: PathBuf,
}

impl ProjectContext {
    /// Resolve the project context from the current working directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            GmsdError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Ok(Self::resolve_from(cwd))
    }

    /// Resolve the project context rooted at a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let planning_dir = root.join(PLANNING_DIR);
        Self { root, planning_dir }
    }

    /// Path to the shared state document.
    pub fn state_path(&self) -> PathBuf {
        self.planning_dir.join(STATE_FILE)
    }

    /// Path to the file-touch log.
    pub fn touches_path(&self) -> PathBuf {
        self.planning_dir.join(TOUCHES_FILE)
    }

    /// Path to the optional configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.planning_dir.join(CONFIG_FILE)
    }

    /// Directory holding one subdirectory per phase (`{n}-{slug}/`).
    pub fn phases_dir(&self) -> PathBuf {
        self.planning_dir.join(PHASES_DIR)
    }

    /// Locate the plan document for a phase.
    ///
    /// Picks the first directory (by name) under `phases/` whose name starts
    /// with `{phase}-` and that contains a `PLAN.md`. Returns `None` when the
    /// phases directory is missing or unreadable, or when nothing matches.
    pub fn plan_path(&self, phase: &str) -> Option<PathBuf> {
        let prefix = format!("{}-", phase);
        let entries = std::fs::read_dir(self.phases_dir()).ok()?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
            .map(|entry| entry.path())
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .map(|dir| dir.join(PLAN_FILE))
            .find(|plan| plan.is_file())
    }
}
