// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Operator decisions for conflicting links.
//!
//! Whenever a destination already exists, the reconciler asks a
//! [`DecisionProvider`] what to do about it. The operator answers with one of
//! four replies:
//!
//! - `y`: replace this destination only.
//! - `n`: leave this destination alone.
//! - `ya`: replace this destination, and every destination after it.
//! - `na`: leave this destination alone, and every destination after it.
//!
//! Anything else is read as `n`.
//!
//! # Terminals and Pipes
//!
//! Replies come through an `inquire` prompt when standard input is a
//! terminal. Otherwise exactly one line is read from standard input per
//! question, so replies can be scripted or piped in.

use inquire::Text;
use std::{
    collections::VecDeque,
    io::{stdin, stdout, BufRead, IsTerminal, Write},
    path::Path,
    str::FromStr,
};
use tracing::{debug, instrument};

/// Help text listing the accepted replies.
pub const REPLY_HELP: &str = "y = yes, n = no, ya = yes to all, na = no to all";

/// Ask operator a question, and return one line of reply.
///
/// Uses a terminal prompt when standard input is a terminal, and reads one
/// plain line from standard input otherwise. Returns `None` once standard
/// input has been exhausted.
///
/// # Errors
///
/// - Return [`PromptError::Inquire`] if terminal prompt fails.
/// - Return [`PromptError::Io`] if standard input cannot be read.
pub fn ask_operator(question: &str, help: &str) -> Result<Option<String>> {
    if stdin().is_terminal() {
        let answer = Text::new(question).with_help_message(help).prompt()?;
        return Ok(Some(answer));
    }

    LinePrompter::new(stdin().lock(), stdout().lock()).ask(question)
}

/// Reply of operator to a conflict.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OperatorReply {
    /// Replace this destination.
    Yes,

    /// Keep this destination.
    #[default]
    No,

    /// Replace this destination, and all remaining ones without asking.
    YesToAll,

    /// Keep this destination, and all remaining ones without asking.
    NoToAll,
}

impl FromStr for OperatorReply {
    type Err = std::convert::Infallible;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        // INVARIANT: Unrecognized replies never replace anything.
        let reply = match data.trim().to_ascii_lowercase().as_str() {
            "y" => Self::Yes,
            "ya" => Self::YesToAll,
            "na" => Self::NoToAll,
            _ => Self::No,
        };

        Ok(reply)
    }
}

/// Destination that already exists, and the source that would replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict<'a> {
    pub source: &'a Path,
    pub destination: &'a Path,
}

impl Conflict<'_> {
    /// Question to present to the operator.
    pub fn question(&self) -> String {
        format!(
            "replace {} with {}?",
            self.destination.display(),
            self.source.display()
        )
    }
}

/// Source of decisions for conflicting links.
pub trait DecisionProvider {
    /// Decide what to do about a conflict.
    ///
    /// # Errors
    ///
    /// - Return [`PromptError`] if a reply cannot be obtained at all.
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply>;
}

impl<P> DecisionProvider for &mut P
where
    P: DecisionProvider + ?Sized,
{
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply> {
        (**self).decide(conflict)
    }
}

impl<P> DecisionProvider for Box<P>
where
    P: DecisionProvider + ?Sized,
{
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply> {
        (**self).decide(conflict)
    }
}

/// Ask operator through terminal prompt.
///
/// Reads exactly one line per conflict.
#[derive(Debug, Default, Clone)]
pub struct InquirePrompter;

impl InquirePrompter {
    /// Construct new terminal prompter.
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProvider for InquirePrompter {
    #[instrument(skip(self, conflict), level = "debug")]
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply> {
        let question = conflict.question();
        let reply: OperatorReply = ask_operator(&question, REPLY_HELP)?
            .unwrap_or_default()
            .parse()
            .unwrap_or_default();
        debug!("operator replied {reply:?} to {question:?}");

        Ok(reply)
    }
}

/// Ask operator through plain lines of text.
///
/// Writes each question to `writer`, then reads exactly one line of reply
/// from `reader`. An exhausted reader answers `n` to everything.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LinePrompter<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Construct new line prompter.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Write question, and read one line of reply.
    ///
    /// Returns `None` if reader has nothing left.
    ///
    /// # Errors
    ///
    /// - Return [`PromptError::Io`] if writing or reading fails.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.writer, "{question} ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R, W> DecisionProvider for LinePrompter<R, W>
where
    R: BufRead,
    W: Write,
{
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply> {
        let question = format!("{} [y/n/ya/na]", conflict.question());
        let reply: OperatorReply = self
            .ask(&question)?
            .unwrap_or_default()
            .parse()
            .unwrap_or_default();

        Ok(reply)
    }
}

/// Answer conflicts from a fixed script of replies.
///
/// Records every conflict that was asked about. Replies `n` once the script
/// runs out.
#[derive(Debug, Default, Clone)]
pub struct ScriptedReplies {
    replies: VecDeque<OperatorReply>,
    asked: Vec<String>,
}

impl ScriptedReplies {
    /// Construct new scripted decision provider.
    pub fn new(replies: impl IntoIterator<Item = OperatorReply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl DecisionProvider for ScriptedReplies {
    fn decide(&mut self, conflict: &Conflict<'_>) -> Result<OperatorReply> {
        self.asked.push(conflict.question());
        Ok(self.replies.pop_front().unwrap_or_default())
    }
}

/// Operator prompt error types.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Terminal prompt failed.
    #[error("failed to obtain reply from operator")]
    Inquire(#[from] inquire::InquireError),

    /// Plain line of reply cannot be read.
    #[error("failed to read reply from standard input")]
    Io(#[from] std::io::Error),
}

/// Friendly result alias :3
pub type Result<T, E = PromptError> = std::result::Result<T, E>;
