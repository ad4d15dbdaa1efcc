//! Bounded execution of project check commands.
//!
//! Commands are split with shell-words and spawned directly (no shell) in the
//! project root. Output goes to anonymous temp files so a chatty test suite
//! can never fill a pipe and stall the wait loop.

use crate::error::{GmsdError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of running one check command to completion.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Exit code (None if terminated by a signal).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Output worth showing a worker: stderr when present, else stdout.
    pub fn diagnostic_output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Run `command` in `cwd`, killing it if it outlives `timeout`.
///
/// A timeout surfaces as [`GmsdError::Timeout`]; a command that cannot be
/// parsed or spawned is a `UserError`. Neither is a verdict on the code.
pub fn run_command(command: &str, cwd: &Path, timeout: Duration) -> Result<CommandOutcome> {
    let args = shell_words::split(command).map_err(|e| {
        GmsdError::UserError(format!(
            "failed to parse check command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            command, e
        ))
    })?;

    let Some((program, cmd_args)) = args.split_first() else {
        return Err(GmsdError::UserError(format!(
            "check command is empty after parsing: '{}'",
            command
        )));
    };

    let mut stdout_file = capture_file()?;
    let mut stderr_file = capture_file()?;

    let mut child = Command::new(program)
        .args(cmd_args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(clone_handle(&stdout_file)?))
        .stderr(Stdio::from(clone_handle(&stderr_file)?))
        .spawn()
        .map_err(|e| {
            GmsdError::UserError(format!(
                "failed to execute check command '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                program, e
            ))
        })?;

    tracing::debug!(command, "running check command");
    let Some(status) = wait_with_timeout(&mut child, timeout)? else {
        return Err(GmsdError::Timeout {
            command: command.to_string(),
            seconds: timeout.as_secs(),
        });
    };

    Ok(CommandOutcome {
        exit_code: status.code(),
        stdout: read_capture(&mut stdout_file)?,
        stderr: read_capture(&mut stderr_file)?,
    })
}

/// Wait for a child process; `None` means it was killed at the deadline.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok(None);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(GmsdError::UserError(format!(
                    "failed to check process status: {}",
                    e
                )));
            }
        }
    }
}

fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

fn capture_file() -> Result<File> {
    tempfile::tempfile().map_err(|e| {
        GmsdError::UserError(format!("failed to create output capture file: {}", e))
    })
}

fn clone_handle(file: &File) -> Result<File> {
    file.try_clone().map_err(|e| {
        GmsdError::UserError(format!("failed to duplicate output capture handle: {}", e))
    })
}

fn read_capture(file: &mut File) -> Result<String> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))
        .and_then(|_| file.read_to_end(&mut bytes))
        .map_err(|e| GmsdError::UserError(format!("failed to read command output: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
