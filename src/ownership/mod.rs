//! File ownership resolution from phase plans.
//!
//! The ownership map is derived from the current phase's `PLAN.md` every time
//! it is needed. Nothing is cached, so an edited plan takes effect on the next
//! intercepted write.

pub mod extract;
mod paths;


pub use paths::normalize_path;

use crate::context::ProjectContext;
use crate::state::StateStore;
use extract::EXTRACTORS;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Task number inside a label such as `Task 2: UI` or `task 2`.
static TASK_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Task\s+(\d+)").expect("Invalid task number regex"));

/// Ordered mapping of normalized file path to owning task label.
///
/// Insertion order is kept: suffix matching in [`OwnershipMap::find_owner`]
/// returns the earliest declared entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipMap {
    entries: Vec<(String, String)>,
}

impl OwnershipMap {
    /// Build the map from plan text.
    ///
    /// Extractors run in precedence order and the first declaration of a path
    /// wins, so an explicit table or bullet entry beats a task's file list.
    pub fn from_plan(text: &str) -> Self {
        let mut map = Self::default();
        for extractor in EXTRACTORS {
            for decl in extractor(text) {
                map.insert_if_absent(&decl.path, &decl.owner);
            }
        }
        map
    }

    /// Record `path -> owner` unless the path is already owned.
    ///
    /// Returns whether the entry was added.
    pub fn insert_if_absent(&mut self, path: &str, owner: &str) -> bool {
        let key = normalize_path(path, None);
        if key.is_empty() || self.get(&key).is_some() {
            return false;
        }
        self.entries.push((key, owner.trim().to_string()));
        true
    }

    /// Exact lookup by normalized path.
    pub fn get(&self, normalized: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(path, _)| path == normalized)
            .map(|(_, owner)| owner.as_str())
    }

    /// Find the owner of a file reported by a tool.
    ///
    /// The candidate is normalized relative to `root`. A direct match wins;
    /// otherwise the first entry where either path is a string suffix of the
    /// other is used, which tolerates plans and tools that disagree on how
    /// much leading directory context to include.
    pub fn find_owner(&self, file_path: &str, root: &Path) -> Option<&str> {
        let normalized = normalize_path(file_path, Some(root));
        if normalized.is_empty() {
            return None;
        }

        if let Some(owner) = self.get(&normalized) {
            return Some(owner);
        }

        self.entries
            .iter()
            .find(|(owned, _)| {
                is_path_suffix(&normalized, owned) || is_path_suffix(owned, &normalized)
            })
            .map(|(_, owner)| owner.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, o)| (p.as_str(), o.as_str()))
    }
}

/// Derive the ownership map for the phase named in the state document.
///
/// Returns `None` when there is no current phase, no plan for it, the plan
/// cannot be read, or the plan declares no ownership at all.
pub fn resolve_ownership(ctx: &ProjectContext, store: &StateStore) -> Option<OwnershipMap> {
    let phase = store.current_phase()?;
    let plan_path = ctx.plan_path(&phase)?;

    let text = match std::fs::read_to_string(&plan_path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %plan_path.display(), error = %e, "plan unreadable");
            return None;
        }
    };

    let map = OwnershipMap::from_plan(&text);
    tracing::debug!(
        phase = %phase,
        plan = %plan_path.display(),
        entries = map.len(),
        "resolved file ownership"
    );

    (!map.is_empty()).then_some(map)
}

/// Extract `N` from the first `Task N` in a label.
pub fn extract_task_number(label: &str) -> Option<u64> {
    TASK_NUMBER_REGEX
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
}

/// `path` ends with a non-empty `suffix`.
fn is_path_suffix(path: &str, suffix: &str) -> bool {
    !suffix.is_empty() && path.ends_with(suffix)
}
