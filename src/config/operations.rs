//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::context::ProjectContext;
use crate::error::{GmsdError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            GmsdError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the project config, falling back to defaults.
    ///
    /// A missing file is the normal case. An unreadable or invalid file is
    /// logged and ignored: the gates must stay fail-open on bad input.
    pub fn load_or_default(ctx: &ProjectContext) -> Self {
        let path = ctx.config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| GmsdError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GmsdError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `active_status` must be non-empty
    /// - `completion_timeout_secs` must be positive
    /// - `output_excerpt_chars` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.active_status.trim().is_empty() {
            return Err(GmsdError::UserError(
                "config validation failed: active_status must not be empty".to_string(),
            ));
        }

        if self.completion_timeout_secs == 0 {
            return Err(GmsdError::UserError(
                "config validation failed: completion_timeout_secs must be greater than 0"
                    .to_string(),
            ));
        }

        if self.output_excerpt_chars == 0 {
            return Err(GmsdError::UserError(
                "config validation failed: output_excerpt_chars must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a tool name is one of the content-mutating kinds.
    pub fn is_mutating_tool(&self, tool: &str) -> bool {
        self.mutating_tools.iter().any(|t| t == tool)
    }
}
