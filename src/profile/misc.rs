// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Miscellaneous profile.
//!
//! Configuration of smaller tools that do not need any setup beyond having
//! their configuration files linked in.

use crate::{
    link::DecisionProvider,
    profile::{Result, SetupContext},
};

/// Managed entries of misc profile.
pub const ENTRIES: [&str; 3] = [".tmux.conf", ".gitconfig", ".inputrc"];

pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    ctx.link_entries(&ENTRIES).await?;
    Ok(())
}
