//! Exit code constants for the gmsd CLI.
//!
//! Hosts read these codes to decide whether an intercepted action proceeds:
//! - 0: Success / allow
//! - 1: Internal or user error (callers treat it as non-blocking)
//! - 2: Block (a genuine coordination conflict was detected)

/// Successful execution; for gates, the action is allowed.
pub const SUCCESS: i32 = 0;

/// User or internal error: bad arguments, missing/corrupt state, timeouts.
pub const USER_ERROR: i32 = 1;

/// The gate blocked the action. The reason is printed to stderr.
pub const BLOCKED: i32 = 2;
