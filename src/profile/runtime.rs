// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Language runtime profile.
//!
//! Downloads the installer script of a language version manager with `curl`,
//! and hands it to `bash`. Whatever the installer does is opaque to us, only
//! its exit status matters.
//!
//! The installer is downloaded into a freshly created temporary file with an
//! unpredictable name, so nothing else on the machine can plant or swap the
//! script that gets run.

use crate::{
    command::{syscall_interactive, syscall_non_interactive},
    link::DecisionProvider,
    profile::{require_capability, Result, SetupContext, SetupError},
};

use std::ffi::OsStr;
use tempfile::{Builder, TempPath};
use tracing::{info, instrument};

/// Name prefix of downloaded installer inside the temporary directory.
pub const INSTALLER_PREFIX: &str = "dotstrap-runtime-";

/// Create empty scratch file for installer script.
///
/// File is removed once the returned path is dropped.
fn installer_file() -> Result<TempPath> {
    let file = Builder::new()
        .prefix(INSTALLER_PREFIX)
        .suffix(".sh")
        .tempfile()
        .map_err(SetupError::TempFile)?;

    Ok(file.into_temp_path())
}

#[instrument(skip(ctx), level = "debug")]
pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    require_capability("curl")?;
    require_capability("bash")?;

    let url = &ctx.settings.runtime.installer_url;

    // INVARIANT: Installer never outlives this step, even when it fails.
    let installer = installer_file()?;
    info!("download {url} into {:?}", installer.display());
    let args: [&OsStr; 4] = [
        "-fsSL".as_ref(),
        url.as_ref(),
        "-o".as_ref(),
        installer.as_os_str(),
    ];
    syscall_non_interactive("curl", args).await?;

    info!("run {:?}", installer.display());
    syscall_interactive("bash", [installer.as_os_str()], None).await?;

    Ok(())
}
