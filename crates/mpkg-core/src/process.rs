//! External command execution
//!
//! A thin wrapper over `tokio::process::Command` that captures output as
//! lines. A non-zero exit status is reported, not raised: callers decide
//! whether a failed step aborts or is skipped.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout joined back into one string
    pub fn stdout(&self) -> String {
        self.stdout_lines.join("\n")
    }

    /// Stderr joined back into one string
    pub fn stderr(&self) -> String {
        self.stderr_lines.join("\n")
    }
}

/// Run `program` with `args`, optionally inside `working_dir`
///
/// Stdin is closed so the command can never block waiting for input.
///
/// # Errors
/// Returns [`Error::ProcessSpawn`] if the program cannot be started.
pub async fn run_command(
    program: &str,
    args: &[&str],
    working_dir: Option<&Path>,
) -> Result<CommandOutput> {
    debug!("Running: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let output = cmd
        .output()
        .await
        .map_err(|e| Error::process_spawn(program, e))?;

    let result = CommandOutput {
        exit_code: output.status.code(),
        stdout_lines: split_lines(&output.stdout),
        stderr_lines: split_lines(&output.stderr),
    };

    debug!("{} exited with {:?}", program, result.exit_code);
    Ok(result)
}

/// Check whether `program` can be found on PATH
pub fn command_available(program: &str) -> bool {
    which::which(program).is_ok()
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}
