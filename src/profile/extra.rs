// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Extra package profile.
//!
//! Builds the Boost C++ libraries from source through the installer script
//! kept at `scripts/boost_install.py` in the dotfiles source root. The script
//! downloads the release archive, extracts it into the temporary directory,
//! then runs Boost's own `bootstrap` and `b2 install` against an installation
//! prefix.
//!
//! Every Boost release is installed into its own versioned prefix. Projects
//! select one of them at configure time with `-DBOOST_ROOT=<prefix>`.

use crate::{
    command::syscall_interactive,
    link::DecisionProvider,
    profile::{require_capability, Result, SetupContext, SetupError},
};

use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
};
use tracing::{info, instrument};

/// Location of installer script relative to dotfiles source root.
pub const INSTALLER_SCRIPT: &str = "scripts/boost_install.py";

/// Base URL of Boost release archives.
pub const RELEASE_URL: &str = "https://boostorg.jfrog.io/artifactory/main/release";

/// Interpreter used to run installer script.
pub const INTERPRETER: &str = "python3";

/// Everything known about a Boost release before it gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoostRelease {
    /// Version as given, e.g., "1.76".
    pub requested: String,

    /// Full dotted version, e.g., "1.76.0".
    pub version: String,

    /// Name of source archive, e.g., "boost_1_76_0.tar.gz".
    pub archive: String,

    /// Where source archive gets downloaded from.
    pub url: String,

    /// Normalized installation prefix.
    pub prefix: PathBuf,
}

impl BoostRelease {
    /// Describe release for requested version.
    ///
    /// Uses a versioned system prefix when no prefix is given.
    pub fn new(requested: impl Into<String>, prefix: Option<&Path>) -> Self {
        let requested = requested.into();
        let version = format!("{requested}.0");
        let archive = format!("boost_{}.tar.gz", version.replace('.', "_"));
        let url = format!("{RELEASE_URL}/{version}/source/{archive}");
        let prefix = match prefix {
            Some(prefix) => normalize(prefix),
            None => normalize(&default_prefix(&version)),
        };

        Self {
            requested,
            version,
            archive,
            url,
            prefix,
        }
    }

    /// Hint for build systems that need to find this release.
    pub fn boost_root_hint(&self) -> String {
        format!("-DBOOST_ROOT={}", self.prefix.display())
    }
}

#[cfg(windows)]
fn default_prefix(version: &str) -> PathBuf {
    PathBuf::from(format!(r"C:\boost\boost_{version}"))
}

#[cfg(not(windows))]
fn default_prefix(version: &str) -> PathBuf {
    PathBuf::from(format!("/usr/local/boost_{version}"))
}

/// Collapse redundant separators, and resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut normal = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => match normal.components().next_back() {
                Some(Component::Normal(_)) => {
                    normal.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => continue,
                _ => normal.push(".."),
            },
            other => normal.push(other),
        }
    }

    if normal.as_os_str().is_empty() {
        normal.push(".");
    }

    normal
}

#[instrument(skip(ctx), level = "debug")]
pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    require_capability(INTERPRETER)?;

    let script = ctx.ensure_dotfiles().await?.join(INSTALLER_SCRIPT);
    if !script.exists() {
        return Err(SetupError::MissingSource { path: script });
    }

    let release = BoostRelease::new(
        ctx.settings.boost.version.clone(),
        ctx.settings.boost.prefix.as_deref(),
    );
    info!("boost {} from {}", release.version, release.url);
    info!("install path {:?}", release.prefix.display());

    let args: [&OsStr; 5] = [
        script.as_os_str(),
        "-v".as_ref(),
        release.requested.as_ref(),
        "-p".as_ref(),
        release.prefix.as_os_str(),
    ];
    syscall_interactive(INTERPRETER, args, script.parent()).await?;
    info!("boost installed, configure projects with {}", release.boost_root_hint());

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test]
    fn release_from_short_version() {
        let result = BoostRelease::new("1.76", None);
        let expect = BoostRelease {
            requested: "1.76".into(),
            version: "1.76.0".into(),
            archive: "boost_1_76_0.tar.gz".into(),
            url: "https://boostorg.jfrog.io/artifactory/main/release/1.76.0/source/boost_1_76_0.tar.gz"
                .into(),
            prefix: "/usr/local/boost_1.76.0".into(),
        };
        assert_eq!(result, expect);
        assert_eq!(result.boost_root_hint(), "-DBOOST_ROOT=/usr/local/boost_1.76.0");
    }

    #[test_case("/opt//boost/", "/opt/boost"; "redundant separators")]
    #[test_case("/opt/./boost/../boost_1.80", "/opt/boost_1.80"; "dot components")]
    #[test_case("/../opt", "/opt"; "parent of root")]
    #[test_case("../opt/boost", "../opt/boost"; "leading parent kept")]
    #[test_case("./", "."; "current directory")]
    #[test]
    fn prefix_is_normalized(input: &str, expect: &str) {
        let result = BoostRelease::new("1.80", Some(Path::new(input)));
        assert_eq!(result.prefix, PathBuf::from(expect));
    }
}
