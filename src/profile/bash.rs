// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Bash profile.

use crate::{
    link::DecisionProvider,
    profile::{Result, SetupContext},
};

/// Managed entries of bash profile.
pub const ENTRIES: [&str; 3] = [".bashrc", ".bash_profile", ".bash_aliases"];

pub(super) async fn setup<P>(ctx: &mut SetupContext<P>) -> Result<()>
where
    P: DecisionProvider,
{
    ctx.link_entries(&ENTRIES).await?;
    Ok(())
}
