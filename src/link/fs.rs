// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Symbolic link primitives.
//!
//! Two ways to place a link exist. A plain link goes exactly where it was
//! asked to go, and fails if anything is already there. A forced link behaves
//! like `ln -sf`: an existing non-directory destination is replaced, but a
//! destination that resolves to a directory receives the link _inside_ it
//! under the source's base name instead of being replaced.

use std::{
    fs::{remove_file, symlink_metadata},
    io::{Error as IoError, ErrorKind},
    path::{Path, PathBuf},
};

/// Create link at exactly `destination` pointing to `source`.
///
/// Returns the path of the new link.
///
/// # Errors
///
/// - Return [`IoError`] if link cannot be created, including when something
///   already exists at `destination`.
pub(crate) fn plain_link(source: &Path, destination: &Path) -> Result<PathBuf, IoError> {
    symlink(source, destination)?;
    Ok(destination.to_path_buf())
}

/// Create link pointing to `source` with `ln -sf` placement rules.
///
/// Returns the path of the new link, which is nested inside `destination`
/// when `destination` resolves to a directory.
///
/// # Errors
///
/// - Return [`IoError`] if existing non-directory entry cannot be removed.
/// - Return [`IoError`] if the final location is itself a real directory.
/// - Return [`IoError`] if link cannot be created.
pub(crate) fn force_link(source: &Path, destination: &Path) -> Result<PathBuf, IoError> {
    // INVARIANT: Directory check follows links, just like ln(1) does.
    let link_path = if destination.is_dir() {
        let name = source.file_name().ok_or_else(|| {
            IoError::new(
                ErrorKind::InvalidInput,
                format!("source {:?} has no base name", source.display()),
            )
        })?;
        destination.join(name)
    } else {
        destination.to_path_buf()
    };

    if let Ok(metadata) = symlink_metadata(&link_path) {
        if metadata.is_dir() {
            return Err(IoError::new(
                ErrorKind::AlreadyExists,
                format!("cannot overwrite directory {:?}", link_path.display()),
            ));
        }
        remove_file(&link_path)?;
    }

    symlink(source, &link_path)?;
    Ok(link_path)
}

#[cfg(unix)]
fn symlink(source: &Path, destination: &Path) -> Result<(), IoError> {
    std::os::unix::fs::symlink(source, destination)
}

#[cfg(windows)]
fn symlink(source: &Path, destination: &Path) -> Result<(), IoError> {
    if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, destination)
    } else {
        std::os::windows::fs::symlink_file(source, destination)
    }
}
