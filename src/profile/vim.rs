// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Vim profile.
//!
//! Installs Vundle, links the vim startup file, and then fetches every plugin
//! that the startup file declares through Vundle's `Plugin` command. Vim
//! itself is never started to do this, the declarations are read straight
//! out of the startup file instead.
//!
//! # Plugin Declarations
//!
//! Vundle understands a few forms of plugin declaration:
//!
//! ```vim
//! Plugin 'tpope/vim-fugitive'                    " GitHub repository
//! Plugin 'L9'                                    " vim-scripts repository
//! Plugin 'git://git.wincent.com/command-t.git'   " Any Git URL
//! Plugin 'ascenator/L9', {'name': 'newL9'}       " Renamed checkout
//! ```
//!
//! The older `Bundle` command is treated the same as `Plugin`.

use crate::{
    link::DecisionProvider,
    profile::{Result, SetupContext, SetupError},
};

use std::{fs::read_to_string, path::Path};
use tracing::{debug, info, instrument, warn};

/// Managed entries of vim profile.
pub const ENTRIES: [&str; 1] = [".vimrc"];

/// Directory holding plugin checkouts, relative to home directory.
pub const BUNDLE_DIR: &str = ".vim/bundle";

/// Directory name of Vundle checkout inside bundle directory.
pub const VUNDLE_NAME: &str = "Vundle.vim";

/// Directories vim expects to write into, relative to home directory.
pub const DERIVED_DIRS: [&str; 3] = [".vim/backup", ".vim/swap", ".vim/undo"];

/// Single plugin declared in vim startup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VimPlugin {
    /// Where to clone plugin from.
    pub locator: String,

    /// Directory name of plugin checkout inside bundle directory.
    pub name: String,
}

/// Extract plugin declarations from vim startup file content.
///
/// Short `owner/name` declarations resolve against `host`. Bare names resolve
/// to the vim-scripts mirror on `host`.
pub fn parse_plugins(content: &str, host: &str) -> Vec<VimPlugin> {
    let host = host.trim_end_matches('/');
    content
        .lines()
        .filter_map(|line| parse_declaration(line.trim_start(), host))
        .collect()
}

fn parse_declaration(line: &str, host: &str) -> Option<VimPlugin> {
    let rest = line
        .strip_prefix("Plugin")
        .or_else(|| line.strip_prefix("Bundle"))?;

    // INVARIANT: Command name must end right there, e.g., not "PluginInstall".
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let (spec, options) = next_quoted(rest)?;
    let locator = if spec.contains("://") || spec.starts_with("git@") {
        spec.to_string()
    } else if spec.contains('/') {
        format!("{host}/{spec}.git")
    } else {
        format!("{host}/vim-scripts/{spec}.git")
    };

    let name = options
        .find("'name'")
        .or_else(|| options.find("\"name\""))
        .and_then(|at| options[at + "'name'".len()..].split_once(':'))
        .and_then(|(_, value)| next_quoted(value))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| checkout_name(spec));

    // INVARIANT: Checkout must land directly inside bundle directory.
    if !is_checkout_name(&name) {
        warn!("ignore plugin {spec:?}, bad checkout name {name:?}");
        return None;
    }

    Some(VimPlugin { locator, name })
}

fn is_checkout_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\'])
}

/// Split off first quoted string, returning it along with what follows it.
fn next_quoted(data: &str) -> Option<(&str, &str)> {
    let data = data.trim_start();
    let quote = data.chars().next().filter(|ch| *ch == '\'' || *ch == '"')?;
    let body = &data[1..];
    let end = body.find(quote)?;

    Some((&body[..end], &body[end + 1..]))
}

fn checkout_name(spec: &str) -> String {
    let last = spec
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(spec);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

#[instrument(skip(ctx), level = "debug")]
pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    let home = ctx.home_dir()?;
    let bundle = home.join(BUNDLE_DIR);
    create_dir(&bundle)?;

    let vundle = ctx.settings.remote.vundle.clone();
    ctx.fetch_into(&vundle, &bundle.join(VUNDLE_NAME)).await?;
    ctx.link_entries(&ENTRIES).await?;

    let vimrc = home.join(ENTRIES[0]);
    let content = read_to_string(&vimrc).map_err(|err| SetupError::ReadFile {
        source: err,
        path: vimrc.clone(),
    })?;
    let plugins = parse_plugins(&content, &ctx.settings.remote.plugin_host);
    info!("{} plugins declared in {:?}", plugins.len(), vimrc.display());
    for plugin in plugins {
        debug!("plugin {} from {}", plugin.name, plugin.locator);
        ctx.fetch_into(&plugin.locator, &bundle.join(&plugin.name))
            .await?;
    }

    for dir in DERIVED_DIRS {
        create_dir(&home.join(dir))?;
    }

    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    mkdirp::mkdirp(path).map_err(|err| SetupError::CreateDir {
        source: err,
        path: path.to_path_buf(),
    })?;
    Ok(())
}
