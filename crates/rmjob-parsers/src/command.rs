//! Command execution utilities for resource manager clients.

use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
    #[error("Command {command} failed: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl CommandError {
    /// Standard error of a command that ran and failed.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            CommandError::Failed { stderr, .. } => Some(stderr),
            CommandError::Execution { .. } => None,
        }
    }

    /// Exit status of a command that ran and failed.
    pub fn code(&self) -> Option<i32> {
        match self {
            CommandError::Failed { code, .. } => *code,
            CommandError::Execution { .. } => None,
        }
    }
}

fn execution_error(name: &str, error: std::io::Error) -> CommandError {
    CommandError::Execution {
        command: name.to_string(),
        error: error.to_string(),
    }
}

fn into_stdout(output: std::process::Output, name: &str) -> Result<String, CommandError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            command: name.to_string(),
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Execute a command and return stdout as a string.
pub async fn run_command(cmd: &mut Command, name: &str) -> Result<String, CommandError> {
    let output = cmd.output().await.map_err(|e| execution_error(name, e))?;
    into_stdout(output, name)
}

/// Execute a command with `input` written to its stdin and return stdout.
///
/// qsub reads the job script this way.
pub async fn run_command_with_input(
    cmd: &mut Command,
    name: &str,
    input: &str,
) -> Result<String, CommandError> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| execution_error(name, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| execution_error(name, e))?;
        // stdin is dropped here so the child sees EOF
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| execution_error(name, e))?;
    into_stdout(output, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_command_success() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let result = run_command(&mut cmd, "echo").await.unwrap();
        assert_eq!(result.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_command_not_found() {
        let mut cmd = Command::new("nonexistent_command_12345");
        let result = run_command(&mut cmd, "nonexistent").await;
        assert!(matches!(result, Err(CommandError::Execution { .. })));
    }

    #[tokio::test]
    async fn test_run_command_failure_keeps_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo 'qstat: Unknown Job Id 1.server' >&2; exit 153"]);
        let err = run_command(&mut cmd, "qstat").await.unwrap_err();
        assert_eq!(err.code(), Some(153));
        assert_eq!(err.stderr(), Some("qstat: Unknown Job Id 1.server"));
    }

    #[tokio::test]
    async fn test_run_command_with_input() {
        let mut cmd = Command::new("cat");
        let result = run_command_with_input(&mut cmd, "cat", "#!/bin/bash\necho hi\n")
            .await
            .unwrap();
        assert_eq!(result, "#!/bin/bash\necho hi\n");
    }
}
