//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for the coordination gates.
///
/// This struct represents the contents of `.planning/gmsd.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Coordination settings
    // =========================================================================
    /// `phase_status` value that marks coordination as active.
    #[serde(default = "default_active_status")]
    pub active_status: String,

    /// Tool names that mutate file content and go through the write gate.
    #[serde(default = "default_mutating_tools")]
    pub mutating_tools: Vec<String>,

    // =========================================================================
    // Completion gate settings
    // =========================================================================
    /// Wall-clock budget for each test/lint command.
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,

    /// Maximum characters of command output quoted in a block message.
    #[serde(default = "default_output_excerpt_chars")]
    pub output_excerpt_chars: usize,

    /// Test command override. An empty string disables the test step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_command: Option<String>,

    /// Lint command override. An empty string disables the lint step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lint_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_status: default_active_status(),
            mutating_tools: default_mutating_tools(),
            completion_timeout_secs: default_completion_timeout_secs(),
            output_excerpt_chars: default_output_excerpt_chars(),
            test_command: None,
            lint_command: None,
        }
    }
}
