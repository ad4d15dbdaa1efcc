//! Error types for the gmsd CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for gmsd operations.
///
/// Each variant maps to a specific exit code. Only `Blocked` maps to the
/// blocking code; everything else is treated by hosts as fail-open.
#[derive(Error, Debug)]
pub enum GmsdError {
    /// A key path is absent from the state document.
    #[error("{0}")]
    NotFound(String),

    /// The value at a key path does not have the shape an operation requires.
    #[error("Field \"{path}\" is not {expected} (got {found})")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// User provided invalid arguments or the workspace is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// A gate detected a genuine conflict and refuses the action.
    #[error("{0}")]
    Blocked(String),

    /// An external command exceeded its wall-clock budget.
    #[error("command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },
}

impl GmsdError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GmsdError::NotFound(_) => exit_codes::USER_ERROR,
            GmsdError::TypeMismatch { .. } => exit_codes::USER_ERROR,
            GmsdError::UserError(_) => exit_codes::USER_ERROR,
            GmsdError::Blocked(_) => exit_codes::BLOCKED,
            GmsdError::Timeout { .. } => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for gmsd operations.
pub type Result<T> = std::result::Result<T, GmsdError>;
