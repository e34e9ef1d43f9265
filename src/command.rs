// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! External command helpers.
//!
//! Every installer step that dotstrap performs is an opaque external process
//! whose success is determined solely by its exit status. These helpers wrap
//! the process plumbing, and provide capability detection so that callers can
//! fail early when a required tool is missing from `PATH`.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Check if external program is available on `PATH`.
pub fn has_command(program: impl AsRef<OsStr>) -> bool {
    which::which(program.as_ref()).is_ok()
}

/// Require external program to be available on `PATH`.
///
/// # Errors
///
/// - Return [`CommandError::Missing`] if program cannot be found.
pub fn require_command(program: impl AsRef<OsStr>) -> Result<PathBuf> {
    which::which(program.as_ref()).map_err(|_| CommandError::Missing {
        program: program.as_ref().to_string_lossy().into_owned(),
    })
}

/// Run program interactively, inheriting stdin, stdout, and stderr.
///
/// Blocks the current flow until the program exits.
///
/// # Errors
///
/// - Return [`CommandError::Spawn`] if program cannot be started.
/// - Return [`CommandError::Failed`] if program exits non-zero.
#[instrument(skip(cmd, args, cwd), level = "debug")]
pub async fn syscall_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    cwd: Option<&Path>,
) -> Result<()> {
    let program = cmd.as_ref().to_string_lossy().into_owned();
    let mut command = Command::new(cmd.as_ref());
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    debug!("run {program:?} interactively");
    let status = command
        .spawn()
        .map_err(|err| CommandError::Spawn {
            source: err,
            program: program.clone(),
        })?
        .wait()
        .await
        .map_err(|err| CommandError::Spawn {
            source: err,
            program: program.clone(),
        })?;

    if !status.success() {
        return Err(CommandError::Failed {
            program,
            message: format!("exited with {status}"),
        });
    }

    Ok(())
}

/// Run program with captured output.
///
/// Returns stdout and stderr of program together as one message.
///
/// # Errors
///
/// - Return [`CommandError::Spawn`] if program cannot be started.
/// - Return [`CommandError::Failed`] if program exits non-zero.
#[instrument(skip(cmd, args), level = "debug")]
pub async fn syscall_non_interactive(
    cmd: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
) -> Result<String> {
    let program = cmd.as_ref().to_string_lossy().into_owned();
    let output = Command::new(cmd.as_ref())
        .args(args)
        .output()
        .await
        .map_err(|err| CommandError::Spawn {
            source: err,
            program: program.clone(),
        })?;
    let message = merge_output(&output.stdout, &output.stderr);

    if !output.status.success() {
        return Err(CommandError::Failed { program, message });
    }

    Ok(message)
}

/// Merge stdout and stderr of a process into one message.
pub(crate) fn merge_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr).into_owned();
    let mut message = String::new();

    if !stdout.is_empty() {
        message.push_str(format!("stdout: {stdout}").as_str());
    }

    if !stderr.is_empty() {
        message.push_str(format!("stderr: {stderr}").as_str());
    }

    // INVARIANT: Chomp trailing newlines.
    message
        .strip_suffix("\r\n")
        .or(message.strip_suffix('\n'))
        .map(ToString::to_string)
        .unwrap_or(message)
}

/// External command error types.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Program is not available on `PATH`.
    #[error("required command {program:?} not found")]
    Missing { program: String },

    /// Program could not be started or waited on.
    #[error("failed to run command {program:?}")]
    Spawn {
        #[source]
        source: std::io::Error,
        program: String,
    },

    /// Program exited with non-zero status.
    #[error("command {program:?} failed:\n{message}")]
    Failed { program: String, message: String },
}

/// Friendly result alias :3
type Result<T, E = CommandError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_program_is_reported() {
        assert!(!has_command("dotstrap-no-such-program"));
        let result = require_command("dotstrap-no-such-program");
        assert!(matches!(result, Err(CommandError::Missing { .. })));
    }

    #[test]
    fn merge_output_chomps_trailing_newline() {
        let result = merge_output(b"hello\n", b"");
        assert_eq!(result, "stdout: hello");

        let result = merge_output(b"", b"oops\r\n");
        assert_eq!(result, "stderr: oops");

        let result = merge_output(b"", b"");
        assert_eq!(result, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_interactive_captures_output() -> anyhow::Result<()> {
        let result = syscall_non_interactive("echo", ["hello"]).await?;
        assert_eq!(result, "stdout: hello");
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_interactive_reports_failure() {
        let result = syscall_non_interactive("false", [] as [&str; 0]).await;
        assert!(matches!(result, Err(CommandError::Failed { .. })));
    }
}
