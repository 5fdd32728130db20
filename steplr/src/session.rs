//! Undo history and the per-run session that drives a [`ParseContext`].
//!
//! A [`Session`] is created for a table and owns at most one run at a time.
//! Every forward step first pushes a snapshot of the idle context onto the
//! [`History`]; stepping back pops the most recent snapshot and restores it.
//! Snapshots are never modified once pushed.

use crate::error::ParseError;
use crate::parser::{ParseContext, Snapshot};
use crate::table::{Action, ParserTable};
use smartstring::alias::String;
use std::sync::Arc;

/// Append-only stack of snapshots.
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

/// Drives one parse run at a time over a shared table.
#[derive(Debug)]
pub struct Session {
    table: Arc<ParserTable>,
    context: Option<ParseContext>,
    history: History,
}

impl Session {
    pub fn new(table: Arc<ParserTable>) -> Self {
        Self {
            table,
            context: None,
            history: History::new(),
        }
    }

    pub fn table(&self) -> &ParserTable {
        &self.table
    }

    pub fn context(&self) -> Option<&ParseContext> {
        self.context.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Starts a new run over `tokens`, dropping any previous run and its
    /// history.
    pub fn start<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.history.clear();
        self.context = Some(ParseContext::new(Arc::clone(&self.table), tokens));
        log::debug!("session started");
    }

    /// Executes one instruction, remembering the state before it.
    pub fn forward(&mut self) -> Result<Action, ParseError> {
        let ctx = self.context.as_mut().ok_or(ParseError::NotStarted)?;
        if ctx.is_finished() {
            return Err(ParseError::Finished);
        }
        self.history.push(ctx.snapshot()?);
        ctx.step()
    }

    /// Undoes the last instruction. Returns `false` when there is nothing to
    /// undo.
    pub fn back(&mut self) -> Result<bool, ParseError> {
        let ctx = self.context.as_mut().ok_or(ParseError::NotStarted)?;
        match self.history.pop() {
            Some(snapshot) => {
                ctx.restore(&snapshot);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Steps forward until accept and returns the number of instructions run.
    pub fn run_to_end(&mut self) -> Result<usize, ParseError> {
        let mut count = 0;
        while !self.is_finished() {
            self.forward()?;
            count += 1;
        }
        Ok(count)
    }

    pub fn is_finished(&self) -> bool {
        self.context.as_ref().is_some_and(ParseContext::is_finished)
    }

    /// Discards the current run and its history.
    pub fn stop(&mut self) {
        self.context = None;
        self.history.clear();
    }
}
