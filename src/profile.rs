// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Environment profiles.
//!
//! A __profile__ is a named bundle of setup steps for one part of the user's
//! environment. Every profile composes the same few building blocks in its
//! own fixed order:
//!
//! 1. Capability checks for external tools it cannot do without.
//! 2. Zero or more fetches through the [`ProgressFetcher`].
//! 3. Zero or one reconciliation of its managed entries through the
//!    [`LinkReconciler`].
//! 4. Post-steps specific to the profile.
//!
//! Profiles that link anything first make sure that the dotfiles source root
//! exists, cloning it from the configured remote when it does not.
//!
//! Any failing step aborts the profile on the spot. Nothing is retried, and
//! nothing already done is rolled back.

pub mod extra;
pub mod vim;

mod bash;
mod misc;
mod runtime;
mod zsh;

use crate::{
    command::{require_command, CommandError},
    config::{ConfigError, Settings},
    fetch::{fetch_if_absent, FetchError, ProgressFetcher},
    link::{DecisionProvider, LinkError, LinkReconciler, ReconciliationReport},
    path::NoWayHome,
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{info, instrument};

/// Selectable environment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Profile {
    /// Bash startup files.
    Bash,

    /// Zsh with oh-my-zsh.
    Zsh,

    /// Vim with Vundle plugins.
    Vim,

    /// Miscellaneous tool configuration.
    Misc,

    /// Language version manager.
    Runtime,

    /// Boost libraries built from source.
    Extra,
}

impl Profile {
    /// All profiles in menu order.
    pub const ALL: [Profile; 6] = [
        Self::Bash,
        Self::Zsh,
        Self::Vim,
        Self::Misc,
        Self::Runtime,
        Self::Extra,
    ];

    /// Short name of profile.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Vim => "vim",
            Self::Misc => "misc",
            Self::Runtime => "runtime",
            Self::Extra => "extra",
        }
    }

    /// One line summary of what the profile sets up.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Bash => "bash startup files",
            Self::Zsh => "zsh with oh-my-zsh",
            Self::Vim => "vim with Vundle plugins",
            Self::Misc => "tmux, git, and readline configuration",
            Self::Runtime => "language version manager",
            Self::Extra => "boost libraries from source",
        }
    }
}

impl Display for Profile {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = SetupError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.name() == data)
            .ok_or_else(|| SetupError::UnknownProfile(data.into()))
    }
}

/// Everything a profile needs to run.
#[derive(Debug)]
pub struct SetupContext<P>
where
    P: DecisionProvider,
{
    pub settings: Settings,
    pub fetcher: ProgressFetcher,
    pub decisions: P,
}

impl<P> SetupContext<P>
where
    P: DecisionProvider,
{
    /// Construct new setup context.
    pub fn new(settings: Settings, fetcher: ProgressFetcher, decisions: P) -> Self {
        Self {
            settings,
            fetcher,
            decisions,
        }
    }

    /// Absolute path to destination root.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::Path`] if home directory cannot be determined.
    pub fn home_dir(&self) -> Result<PathBuf> {
        Ok(self.settings.home_dir()?)
    }

    /// Make sure the dotfiles source root exists.
    ///
    /// Clones it from the configured remote if it is absent.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::NoDotfilesRemote`] if root is absent, and no
    ///   remote has been configured.
    /// - Return [`SetupError::Fetch`] if cloning fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn ensure_dotfiles(&self) -> Result<PathBuf> {
        let dotfiles = self.settings.dotfiles_dir()?;
        if dotfiles.exists() {
            return Ok(dotfiles);
        }

        let Some(url) = &self.settings.remote.dotfiles else {
            return Err(SetupError::NoDotfilesRemote { path: dotfiles });
        };
        self.fetch_into(url, &dotfiles).await?;

        Ok(dotfiles)
    }

    /// Fetch locator into destination unless destination already exists.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::Fetch`] if fetch fails.
    pub async fn fetch_into(&self, locator: &str, destination: &Path) -> Result<bool> {
        Ok(fetch_if_absent(&self.fetcher, locator, destination).await?)
    }

    /// Link managed entries from dotfiles source root into destination root.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::NoDotfilesRemote`] or [`SetupError::Fetch`] if
    ///   dotfiles source root cannot be obtained.
    /// - Return [`SetupError::Link`] if reconciliation fails.
    pub async fn link_entries(&mut self, entries: &[&str]) -> Result<ReconciliationReport> {
        let dotfiles = self.ensure_dotfiles().await?;
        let home = self.home_dir()?;
        let mut reconciler = LinkReconciler::new(&mut self.decisions);
        let report = reconciler.reconcile(entries.iter(), &dotfiles, &home)?;
        info!(
            "{} linked, {} skipped",
            report.linked(),
            report.skipped()
        );

        Ok(report)
    }
}

/// Require external capability.
///
/// # Errors
///
/// - Return [`SetupError::MissingCapability`] if program is not on `PATH`.
pub(crate) fn require_capability(program: &str) -> Result<()> {
    require_command(program).map_err(|_| SetupError::MissingCapability(program.into()))?;
    Ok(())
}

/// Set up environment described by profile.
///
/// # Errors
///
/// - Return [`SetupError`] on the first step that fails.
#[instrument(skip(ctx), level = "debug")]
pub async fn setup_environment<P>(profile: Profile, ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    info!("set up {profile} environment");
    match profile {
        Profile::Bash => bash::setup(ctx).await,
        Profile::Zsh => zsh::setup(ctx).await,
        Profile::Vim => vim::setup(ctx).await,
        Profile::Misc => misc::setup(ctx).await,
        Profile::Runtime => runtime::setup(ctx).await,
        Profile::Extra => extra::setup(ctx).await,
    }
}

/// All possible error types for profile setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// No profile goes by the given name.
    #[error("unknown profile {0:?}")]
    UnknownProfile(String),

    /// Required external tool is not installed.
    #[error("required command {0:?} is not installed")]
    MissingCapability(String),

    /// Required source file does not exist.
    #[error("required file {:?} does not exist", path.display())]
    MissingSource { path: PathBuf },

    /// Dotfiles source root is absent, and cannot be cloned.
    #[error("dotfiles directory {:?} does not exist, and no remote is configured", path.display())]
    NoDotfilesRemote { path: PathBuf },

    /// Derived directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Scratch file for downloaded material cannot be created.
    #[error("failed to create temporary file")]
    TempFile(#[source] std::io::Error),

    /// Configuration file of the profile cannot be read.
    #[error("failed to read {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Fetching fails.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Link reconciliation fails.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// External command fails.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Home directory cannot be determined.
    #[error(transparent)]
    Path(#[from] NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = SetupError> = std::result::Result<T, E>;
