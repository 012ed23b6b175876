//! Subprocess execution for command-backed agents.
//!
//! Runs a rendered command line with a timeout, capturing stdout and stderr
//! to log files so large outputs cannot block the child on a full pipe.

use crate::error::{FlowError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What to run.
#[derive(Debug, Clone)]
pub struct CommandSpec<'a> {
    /// Fully rendered command line (shell-words syntax, no shell).
    pub command_line: &'a str,
    /// Working directory, or inherit when `None`.
    pub working_dir: Option<&'a Path>,
    /// Extra environment variables.
    pub environment: &'a HashMap<String, String>,
    /// Directory receiving `stdout.log` and `stderr.log`.
    pub log_dir: &'a Path,
    /// Kill the process after this long.
    pub timeout: Duration,
}

/// Outcome of running a command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Exit code (None if killed or terminated by a signal).
    pub exit_code: Option<i32>,
    /// Path to the captured stdout.
    pub stdout_path: PathBuf,
    /// Path to the captured stderr.
    pub stderr_path: PathBuf,
    /// Wall-clock duration.
    pub duration: Duration,
    /// Whether the process was killed on timeout.
    pub timed_out: bool,
}

impl CommandOutcome {
    /// Exited with status 0 before the timeout.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Run a command to completion or timeout.
pub fn run_command(spec: &CommandSpec<'_>) -> Result<CommandOutcome> {
    let args = shell_words::split(spec.command_line).map_err(|e| {
        FlowError::AgentError(format!(
            "failed to parse agent command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            spec.command_line, e
        ))
    })?;

    let Some((program, program_args)) = args.split_first() else {
        return Err(FlowError::AgentError(format!(
            "agent command is empty after parsing: '{}'",
            spec.command_line
        )));
    };

    std::fs::create_dir_all(spec.log_dir).map_err(|e| {
        FlowError::AgentError(format!(
            "failed to create agent log directory '{}': {}",
            spec.log_dir.display(),
            e
        ))
    })?;

    let stdout_path = spec.log_dir.join("stdout.log");
    let stderr_path = spec.log_dir.join("stderr.log");
    let stdout_file = create_log(&stdout_path)?;
    let stderr_file = create_log(&stderr_path)?;

    let mut command = Command::new(program);
    command
        .args(program_args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file));
    if let Some(dir) = spec.working_dir {
        command.current_dir(dir);
    }
    for (key, value) in spec.environment {
        command.env(key, value);
    }

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        FlowError::AgentError(format!(
            "failed to execute agent command '{}': {}\n\
             Fix: ensure the command is installed and in PATH.",
            program, e
        ))
    })?;

    let (exit_code, timed_out) = wait_with_timeout(&mut child, spec.timeout)?;

    Ok(CommandOutcome {
        exit_code,
        stdout_path,
        stderr_path,
        duration: start.elapsed(),
        timed_out,
    })
}

fn create_log(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| {
        FlowError::AgentError(format!(
            "failed to create agent log '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // SIGKILL on Unix, TerminateProcess on Windows.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(FlowError::AgentError(format!(
                    "failed to check agent process status: {}",
                    e
                )));
            }
        }
    }
}
