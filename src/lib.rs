// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Personal environment bootstrap.
//!
//! Dotstrap sets up a user's environment one __profile__ at a time: bash, zsh,
//! vim, miscellaneous tools, a language version manager, and extra packages.
//! Profiles clone whatever remote material they need, then link their managed
//! dotfiles from a dotfiles source root into the home directory.
//!
//! # Linking
//!
//! See [`link`] for how existing files in the home directory are handled, and
//! how the operator gets asked about them.
//!
//! # Fetching
//!
//! See [`fetch`] for how remote repositories are cloned with a spinner going.

pub mod command;
pub mod config;
pub mod fetch;
pub mod link;
pub mod menu;
pub mod path;
pub mod profile;

pub use fetch::{FetchOutcome, ProgressFetcher};
pub use link::{LinkDecision, LinkError, LinkReconciler, ReconciliationReport};
pub use profile::{setup_environment, Profile, SetupContext, SetupError};
