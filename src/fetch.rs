// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Repository fetching with progress feedback.
//!
//! Cloning a remote repository can take a while. The [`ProgressFetcher`] runs
//! the clone as an external process on a background task, while the
//! foreground keeps the operator informed by ticking a small text spinner in
//! place until that task terminates.
//!
//! The background task and the foreground loop share nothing except the
//! liveness of the task itself. The foreground polls that liveness with a
//! short delay between spinner frames, then joins the task to collect the
//! exit status of the clone.

use crate::command::{has_command, merge_output};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{process::Command, time::sleep};
use tracing::{debug, info, instrument, warn};

/// Spinner frames cycled while a fetch is running.
pub const SPINNER_FRAMES: [&str; 8] = ["-", "\\", "|", "/", "-", "\\", "|", "."];

/// Default delay between spinner frames.
pub const FRAME_DELAY: Duration = Duration::from_millis(100);

/// Default version control program used to fetch.
pub const DEFAULT_PROGRAM: &str = "git";

/// Result of one fetch.
///
/// Consumed immediately by the caller. Nothing about a fetch is remembered
/// after its outcome has been inspected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    success: bool,
    message: Option<String>,
}

impl FetchOutcome {
    /// Construct successful outcome.
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Construct failed outcome with reason.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Check if fetch succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Reason for failure, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Display for FetchOutcome {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match (self.success, &self.message) {
            (true, _) => fmt.write_str("fetch succeeded"),
            (false, Some(message)) => write!(fmt, "fetch failed: {message}"),
            (false, None) => fmt.write_str("fetch failed"),
        }
    }
}

/// Fetch remote repositories while rendering a spinner.
#[derive(Debug, Clone)]
pub struct ProgressFetcher {
    program: String,
    frame_delay: Duration,
    hidden: bool,
}

impl Default for ProgressFetcher {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            frame_delay: FRAME_DELAY,
            hidden: false,
        }
    }
}

impl ProgressFetcher {
    /// Construct new fetcher using Git.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different version control program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a different delay between spinner frames.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Do not draw the spinner anywhere.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Name of version control program in use.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Clone remote repository at locator.
    ///
    /// Clones into `destination` when given, or lets the version control
    /// program pick a directory name relative to the current working directory
    /// otherwise. Returns a failed outcome right away without starting anything
    /// if the version control program is not available.
    #[instrument(skip(self, locator, destination), level = "debug")]
    pub async fn fetch(&self, locator: &str, destination: Option<&Path>) -> FetchOutcome {
        if !has_command(&self.program) {
            warn!("cannot fetch {locator}: {:?} is not installed", self.program);
            return FetchOutcome::failure(format!(
                "required command {:?} not found",
                self.program
            ));
        }

        let mut command = Command::new(&self.program);
        command
            .args(["clone", "--quiet", locator])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(destination) = destination {
            command.arg(destination);
        }

        info!("fetch {locator}");
        let task = tokio::spawn(async move { command.output().await });

        let bar = self.spinner(locator);
        while !task.is_finished() {
            bar.tick();
            sleep(self.frame_delay).await;
        }

        // INVARIANT: Never move past this point until the task has terminated.
        let joined = task.await;
        bar.finish_and_clear();

        match joined {
            Ok(Ok(output)) if output.status.success() => {
                debug!("fetch of {locator} done");
                FetchOutcome::success()
            }
            Ok(Ok(output)) => FetchOutcome::failure(format!(
                "{} clone of {locator} exited with {}: {}",
                self.program,
                output.status,
                merge_output(&output.stdout, &output.stderr)
            )),
            Ok(Err(err)) => FetchOutcome::failure(format!("failed to run {}: {err}", self.program)),
            Err(err) => FetchOutcome::failure(format!("fetch task did not complete: {err}")),
        }
    }

    fn spinner(&self, locator: &str) -> ProgressBar {
        let bar = if self.hidden {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new_spinner()
        };

        // INVARIANT: The last tick string is the finished state, not a frame.
        let mut ticks = SPINNER_FRAMES.to_vec();
        ticks.push(" ");
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&ticks)
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("fetching {locator}"));
        bar
    }
}

/// Fetch locator into destination unless destination already exists.
///
/// Returns `Ok(false)` if nothing had to be fetched.
///
/// # Errors
///
/// - Return [`FetchError`] if the fetch was attempted and failed.
#[instrument(skip(fetcher, locator, destination), level = "debug")]
pub async fn fetch_if_absent(
    fetcher: &ProgressFetcher,
    locator: &str,
    destination: impl AsRef<Path>,
) -> Result<bool> {
    let destination = destination.as_ref();
    if destination.symlink_metadata().is_ok() {
        info!("{:?} already present, skip fetch", destination.display());
        return Ok(false);
    }

    let outcome = fetcher.fetch(locator, Some(destination)).await;
    if !outcome.is_success() {
        return Err(FetchError {
            locator: locator.into(),
            destination: destination.to_path_buf(),
            message: outcome.message().unwrap_or_default().into(),
        });
    }

    Ok(true)
}

/// Fetch attempt failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch {locator} into {:?}: {message}", destination.display())]
pub struct FetchError {
    pub locator: String,
    pub destination: PathBuf,
    pub message: String,
}

/// Friendly result alias :3
type Result<T, E = FetchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spinner_cycles_eight_frames() {
        assert_eq!(SPINNER_FRAMES.len(), 8);
        assert_eq!(SPINNER_FRAMES.concat(), "-\\|/-\\|.");
    }

    #[test]
    fn outcome_reports_reason() {
        let outcome = FetchOutcome::failure("boom");
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), Some("boom"));
        assert_eq!(outcome.to_string(), "fetch failed: boom");

        let outcome = FetchOutcome::success();
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), None);
    }

    #[tokio::test]
    async fn missing_program_fails_immediately() {
        let fetcher = ProgressFetcher::new()
            .with_program("dotstrap-no-such-vcs")
            .hidden();
        let outcome = fetcher
            .fetch("https://example.invalid/repo.git", None)
            .await;

        assert!(!outcome.is_success());
        assert!(outcome
            .message()
            .is_some_and(|message| message.contains("dotstrap-no-such-vcs")));
    }

    #[tokio::test]
    async fn existing_destination_skips_fetch() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        // A missing program would fail, proving no fetch was attempted.
        let fetcher = ProgressFetcher::new()
            .with_program("dotstrap-no-such-vcs")
            .hidden();

        let fetched = fetch_if_absent(&fetcher, "https://example.invalid/repo.git", scratch.path())
            .await?;
        assert!(!fetched);

        Ok(())
    }

    #[tokio::test]
    async fn absent_destination_propagates_failure() -> anyhow::Result<()> {
        let scratch = tempfile::tempdir()?;
        let fetcher = ProgressFetcher::new()
            .with_program("dotstrap-no-such-vcs")
            .hidden();

        let result = fetch_if_absent(
            &fetcher,
            "https://example.invalid/repo.git",
            scratch.path().join("repo"),
        )
        .await;
        assert!(result.is_err());

        Ok(())
    }
}
