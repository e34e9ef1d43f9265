// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Link reconciliation.
//!
//! Every profile manages a fixed, ordered set of __managed entries__: relative
//! path names like `.bashrc` that exist in the dotfiles source root, and that
//! should be reachable from the user's home directory through a symbolic link.
//! The [`LinkReconciler`] walks those entries in order, and decides for each
//! one whether to create, skip, or overwrite its link.
//!
//! # Reconciliation Runs
//!
//! A single pass over an entry set is a [`ReconciliationRun`]. A run starts
//! out asking the operator about every conflict it finds. Once the operator
//! answers `ya` or `na`, that answer sticks for the remainder of the run, and
//! no further questions are asked. The two sticky answers exclude each other,
//! and neither can be taken back.
//!
//! # Failure
//!
//! Reconciliation is all or nothing with respect to errors. A missing source
//! entry, or a link that cannot be created, aborts the run on the spot. Links
//! created before the failure are left in place.
//!
//! # Forced Links Into Directories
//!
//! Overwriting a destination that resolves to a directory does not replace
//! that directory. The link lands inside of it instead, see [`fs`]. Creating a
//! link where nothing exists yet always uses the exact destination path.

mod fs;
pub mod prompt;

pub use prompt::{
    ask_operator, Conflict, DecisionProvider, InquirePrompter, LinePrompter, OperatorReply,
    PromptError, ScriptedReplies,
};

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// How a single managed entry was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Destination was absent, link created at destination.
    Create,

    /// Destination kept as is.
    Skip,

    /// Destination replaced after operator agreed for this entry only.
    Overwrite,

    /// Destination replaced because of a sticky `ya`.
    OverwriteForceAll,

    /// Destination kept because of a sticky `na`.
    SkipForceAll,
}

impl LinkDecision {
    /// Check if decision places a link.
    pub fn links(&self) -> bool {
        matches!(self, Self::Create | Self::Overwrite | Self::OverwriteForceAll)
    }
}

/// Sticky answer captured during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyReply {
    /// Overwrite everything from here on.
    ForceAll,

    /// Skip everything from here on.
    NoForceAll,
}

/// State of one pass over a managed entry set.
///
/// # Invariant
///
/// - At most one sticky reply is ever latched.
/// - A latched sticky reply is never cleared or replaced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconciliationRun {
    sticky: Option<StickyReply>,
}

impl ReconciliationRun {
    /// Construct fresh run with nothing latched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch sticky reply unless one is already latched.
    ///
    /// Returns the reply that is in effect afterwards.
    pub fn latch(&mut self, reply: StickyReply) -> StickyReply {
        *self.sticky.get_or_insert(reply)
    }

    /// Currently latched sticky reply.
    pub fn sticky(&self) -> Option<StickyReply> {
        self.sticky
    }

    /// Overwrite everything without asking?
    pub fn force_all(&self) -> bool {
        self.sticky == Some(StickyReply::ForceAll)
    }

    /// Skip everything without asking?
    pub fn no_force_all(&self) -> bool {
        self.sticky == Some(StickyReply::NoForceAll)
    }
}

/// Record of how one managed entry ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Managed entry name.
    pub entry: String,

    /// Decision taken.
    pub decision: LinkDecision,

    /// Where the link was placed, if anywhere.
    pub link_path: Option<PathBuf>,
}

/// Record of a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Outcomes in processing order.
    pub outcomes: Vec<LinkOutcome>,
}

impl ReconciliationReport {
    /// Number of entries that got a link.
    pub fn linked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.decision.links())
            .count()
    }

    /// Number of entries left untouched.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.linked()
    }

    /// Decisions in processing order.
    pub fn decisions(&self) -> Vec<LinkDecision> {
        self.outcomes.iter().map(|outcome| outcome.decision).collect()
    }
}

/// Reconcile managed entries into symbolic links.
#[derive(Debug)]
pub struct LinkReconciler<P>
where
    P: DecisionProvider,
{
    decisions: P,
}

impl<P> LinkReconciler<P>
where
    P: DecisionProvider,
{
    /// Construct new reconciler asking `decisions` about conflicts.
    pub fn new(decisions: P) -> Self {
        Self { decisions }
    }

    /// Give back the decision provider.
    pub fn into_inner(self) -> P {
        self.decisions
    }

    /// Reconcile each entry of `entries` from `source_root` into `dest_root`.
    ///
    /// Entries are processed in order. Each entry runs in the same
    /// [`ReconciliationRun`], so a sticky reply given for one entry carries
    /// over to all entries after it.
    ///
    /// # Errors
    ///
    /// - Return [`LinkError::MissingSource`] on the first entry whose source
    ///   does not exist. No later entries are processed.
    /// - Return [`LinkError::LinkCreation`] if a link cannot be placed.
    /// - Return [`LinkError::Prompt`] if operator cannot be asked.
    #[instrument(skip(self, entries, source_root, dest_root), level = "debug")]
    pub fn reconcile(
        &mut self,
        entries: impl IntoIterator<Item = impl AsRef<str>>,
        source_root: impl AsRef<Path>,
        dest_root: impl AsRef<Path>,
    ) -> Result<ReconciliationReport> {
        let mut run = ReconciliationRun::new();
        let mut report = ReconciliationReport::default();

        for entry in entries {
            let entry = entry.as_ref();
            let source = source_root.as_ref().join(entry);
            let destination = dest_root.as_ref().join(entry);
            let outcome = self.reconcile_entry(&mut run, entry, &source, &destination)?;
            report.outcomes.push(outcome);
        }

        debug!(
            "reconciled {} entries: {} linked, {} skipped",
            report.outcomes.len(),
            report.linked(),
            report.skipped()
        );

        Ok(report)
    }

    fn reconcile_entry(
        &mut self,
        run: &mut ReconciliationRun,
        entry: &str,
        source: &Path,
        destination: &Path,
    ) -> Result<LinkOutcome> {
        // INVARIANT: Dangling links still count as existing sources.
        if source.symlink_metadata().is_err() {
            return Err(LinkError::MissingSource {
                path: source.to_path_buf(),
            });
        }

        let decision = match run.sticky() {
            Some(StickyReply::ForceAll) => LinkDecision::OverwriteForceAll,
            Some(StickyReply::NoForceAll) => LinkDecision::SkipForceAll,
            None if destination.symlink_metadata().is_ok() => {
                let conflict = Conflict {
                    source,
                    destination,
                };
                match self.decisions.decide(&conflict)? {
                    OperatorReply::Yes => LinkDecision::Overwrite,
                    OperatorReply::No => LinkDecision::Skip,
                    OperatorReply::YesToAll => {
                        run.latch(StickyReply::ForceAll);
                        LinkDecision::OverwriteForceAll
                    }
                    OperatorReply::NoToAll => {
                        run.latch(StickyReply::NoForceAll);
                        LinkDecision::SkipForceAll
                    }
                }
            }
            None => LinkDecision::Create,
        };

        let link_path = match decision {
            LinkDecision::Create => Some(fs::plain_link(source, destination)),
            LinkDecision::Overwrite | LinkDecision::OverwriteForceAll => {
                Some(fs::force_link(source, destination))
            }
            LinkDecision::Skip | LinkDecision::SkipForceAll => None,
        }
        .transpose()
        .map_err(|err| LinkError::LinkCreation {
            source: err,
            path: destination.to_path_buf(),
        })?;

        match &link_path {
            Some(path) => info!("link {} -> {}", path.display(), source.display()),
            None => info!("skip {}", destination.display()),
        }

        Ok(LinkOutcome {
            entry: entry.into(),
            decision,
            link_path,
        })
    }
}

/// All possible error types for link reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Managed entry does not exist in source root.
    #[error("source {:?} does not exist", path.display())]
    MissingSource { path: PathBuf },

    /// Link could not be placed.
    #[error("failed to create link at {:?}", path.display())]
    LinkCreation {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Operator could not be asked.
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Friendly result alias :3
pub type Result<T, E = LinkError> = std::result::Result<T, E>;
