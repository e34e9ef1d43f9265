// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Zsh profile.
//!
//! Installs the oh-my-zsh framework into `~/.oh-my-zsh` before linking the
//! zsh startup file, because that startup file sources the framework.

use crate::{
    link::DecisionProvider,
    profile::{require_capability, Result, SetupContext},
};

use tracing::instrument;

/// Managed entries of zsh profile.
pub const ENTRIES: [&str; 1] = [".zshrc"];

/// Directory name of oh-my-zsh inside home directory.
pub const OH_MY_ZSH_DIR: &str = ".oh-my-zsh";

#[instrument(skip(ctx), level = "debug")]
pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    require_capability("zsh")?;

    let destination = ctx.home_dir()?.join(OH_MY_ZSH_DIR);
    let url = ctx.settings.remote.oh_my_zsh.clone();
    ctx.fetch_into(&url, &destination).await?;
    ctx.link_entries(&ENTRIES).await?;

    Ok(())
}
