// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the configuration file that dotstrap reads at
//! startup. Every field is optional, such that a missing file or an empty file
//! both produce the default settings.
//!
//! # General Layout
//!
//! ```toml
//! [paths]
//! dotfiles = "$HOME/.dotfiles"
//! home = "$HOME"
//!
//! [remote]
//! dotfiles = "https://example.org/me/dotfiles.git"
//!
//! [boost]
//! version = "1.76"
//!
//! [[environment]]
//! name = "EDITOR"
//! value = "vim"
//!
//! [[environment]]
//! name = "LESSHISTFILE"
//! ```
//!
//! An environment entry without a value removes that variable from the
//! process environment.

use crate::path::{default_dotfiles_dir, home_dir, NoWayHome};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Default remote of oh-my-zsh framework.
pub const OH_MY_ZSH_URL: &str = "https://github.com/ohmyzsh/ohmyzsh.git";

/// Default remote of Vundle plugin manager.
pub const VUNDLE_URL: &str = "https://github.com/VundleVim/Vundle.vim.git";

/// Default host used to resolve short `owner/name` plugin declarations.
pub const PLUGIN_HOST: &str = "https://github.com";

/// Default language version manager installer.
pub const RUNTIME_INSTALLER_URL: &str = "https://pyenv.run";

/// Default Boost release to build.
pub const BOOST_VERSION: &str = "1.76";

/// Settings layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Source and destination roots.
    pub paths: PathSettings,

    /// Remote locations to fetch from.
    pub remote: RemoteSettings,

    /// Language runtime installer settings.
    pub runtime: RuntimeSettings,

    /// Boost build settings.
    pub boost: BoostSettings,

    /// Environment variable edits applied at process start.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<EnvironmentEdit>,
}

impl Settings {
    /// Load settings from file at target path.
    ///
    /// A missing file is not an error, default settings are used instead.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if file exists but cannot be read.
    /// - Return [`ConfigError::Deserialize`] if file content is invalid.
    /// - Return [`ConfigError::ShellExpansion`] if a path cannot be expanded.
    #[instrument(skip(path), level = "debug")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no configuration at {:?}, using defaults", path.display());
            return Ok(Self::default());
        }

        debug!("load configuration from {:?}", path.display());
        read_to_string(path)
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.to_path_buf(),
            })?
            .parse()
    }

    /// Absolute path to dotfiles source root.
    ///
    /// # Errors
    ///
    /// - Return [`NoWayHome`] if no path was configured and the home
    ///   directory cannot be determined.
    pub fn dotfiles_dir(&self) -> Result<PathBuf, NoWayHome> {
        match &self.paths.dotfiles {
            Some(path) => Ok(path.clone()),
            None => default_dotfiles_dir(),
        }
    }

    /// Absolute path to destination root that links are placed into.
    ///
    /// # Errors
    ///
    /// - Return [`NoWayHome`] if no path was configured and the home
    ///   directory cannot be determined.
    pub fn home_dir(&self) -> Result<PathBuf, NoWayHome> {
        match &self.paths.home {
            Some(path) => Ok(path.clone()),
            None => home_dir(),
        }
    }

    /// Apply environment variable edits to current process.
    pub fn apply_environment(&self) {
        for edit in &self.environment {
            edit.apply();
        }
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on every path-like field.
        settings.paths.dotfiles = settings.paths.dotfiles.map(expand_path).transpose()?;
        settings.paths.home = settings.paths.home.map(expand_path).transpose()?;
        settings.boost.prefix = settings.boost.prefix.map(expand_path).transpose()?;
        for edit in &mut settings.environment {
            if let Some(value) = edit.value.take() {
                edit.value = Some(
                    shellexpand::full(&value)
                        .map_err(ConfigError::ShellExpansion)?
                        .into_owned(),
                );
            }
        }

        Ok(settings)
    }
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Source and destination roots.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    /// Dotfiles source root, defaults to `$HOME/.dotfiles`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotfiles: Option<PathBuf>,

    /// Destination root for links, defaults to `$HOME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
}

/// Remote locations.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Remote to clone dotfiles source root from when it is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotfiles: Option<String>,

    /// Remote of oh-my-zsh.
    pub oh_my_zsh: String,

    /// Remote of Vundle.
    pub vundle: String,

    /// Host prefix for short vim plugin declarations.
    pub plugin_host: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            dotfiles: None,
            oh_my_zsh: OH_MY_ZSH_URL.into(),
            vundle: VUNDLE_URL.into(),
            plugin_host: PLUGIN_HOST.into(),
        }
    }
}

/// Language runtime installer settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// URL of installer script to download and run.
    pub installer_url: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            installer_url: RUNTIME_INSTALLER_URL.into(),
        }
    }
}

/// Boost build settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoostSettings {
    /// Release version without patch component, e.g., "1.76".
    pub version: String,

    /// Installation prefix, defaults to a versioned system path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PathBuf>,
}

impl Default for BoostSettings {
    fn default() -> Self {
        Self {
            version: BOOST_VERSION.into(),
            prefix: None,
        }
    }
}

/// Single environment variable assignment or removal.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct EnvironmentEdit {
    /// Variable name.
    pub name: String,

    /// New value, or `None` to remove the variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EnvironmentEdit {
    /// Apply edit to current process environment.
    pub fn apply(&self) {
        match &self.value {
            Some(value) => {
                debug!("export {}={value}", self.name);
                std::env::set_var(&self.name, value);
            }
            None => {
                debug!("unset {}", self.name);
                std::env::remove_var(&self.name);
            }
        }
    }
}

fn expand_path(path: PathBuf) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read configuration at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;
