//! Default value functions for the config model.

/// Value of `phase_status` that switches coordination gating on.
pub const DEFAULT_ACTIVE_STATUS: &str = "executing";

pub(crate) fn default_active_status() -> String {
    DEFAULT_ACTIVE_STATUS.to_string()
}

pub(crate) fn default_mutating_tools() -> Vec<String> {
    vec!["Write".to_string(), "Edit".to_string()]
}

pub(crate) fn default_completion_timeout_secs() -> u64 {
    30
}

pub(crate) fn default_output_excerpt_chars() -> usize {
    500
}
