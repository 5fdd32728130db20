//! Error types raised by the parse engine, the tokenizer and the table loader.
//!
//! Every [`ParseError`] is fatal for the run that produced it: the engine does
//! not retry and does not salvage partial results. The caller is expected to
//! stop the run (or step back through its history) and let the operator start
//! over.
//!
//! # Examples
//!
//! ```rust
//! # use steplr::ParseError;
//! let err = ParseError::InvalidRule { rule: 0, count: 7 };
//! assert!(err.to_string().contains("invalid rule"));
//! ```

use smartstring::alias::String;
use thiserror::Error;

/// Run-time failures of the shift-reduce engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The stack ran out of elements while a reduction was popping its
    /// right-hand side.
    #[error("stack underflow")]
    StackUnderflow,

    /// A reduce instruction named a rule outside `1..=count`.
    #[error("invalid rule {rule} (table has {count} rules)")]
    InvalidRule {
        /// The 1-based rule id that was requested.
        rule: usize,
        /// Number of rules in the table.
        count: usize,
    },

    /// A shift, goto or stack element referenced a state outside the table.
    #[error("invalid state {state} (table has {count} states)")]
    InvalidState {
        /// The requested state index.
        state: usize,
        /// Number of states in the table.
        count: usize,
    },

    /// The symbols on the stack do not spell the right-hand side of the rule
    /// being reduced.
    #[error("rule {rule} expects {expected:?} at position {position}, found {found:?}")]
    ProductionMismatch {
        /// The 1-based rule id.
        rule: usize,
        /// Position within the right-hand side.
        position: usize,
        /// Symbol required by the rule.
        expected: String,
        /// Symbol found on the stack.
        found: String,
    },

    /// No goto entry exists for the nonterminal in the exposed state.
    #[error("no goto for {symbol:?} in state {state}")]
    UnresolvedGoto {
        /// State exposed at the top of the stack after popping.
        state: usize,
        /// The nonterminal produced by the reduction.
        symbol: String,
    },

    /// The lookahead symbol has no action in the current state.
    #[error("unexpected {symbol:?} in state {state}, expected one of {expected:?}")]
    UnresolvedAction {
        /// State at the top of the stack.
        state: usize,
        /// The lookahead terminal.
        symbol: String,
        /// Terminals that would have been accepted.
        expected: Vec<String>,
    },

    /// The input ran out before the end-marker was accepted.
    #[error("unexpected end of input")]
    InputExhausted,

    /// Input remains after the end-marker that would be accepted.
    #[error("{count} tokens after the end-marker")]
    TrailingInput {
        /// Number of tokens following the end-marker.
        count: usize,
    },

    /// The context already reached accept; there is nothing left to execute.
    #[error("parse already finished")]
    Finished,

    /// A snapshot was requested in the middle of an instruction.
    #[error("context is mid-instruction")]
    NotIdle,

    /// A session was driven before a run was started.
    #[error("no parse in progress")]
    NotStarted,
}

/// Failure of the toy tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// No terminal of the vocabulary matches at `offset`.
    #[error("unrecognized token {fragment:?} at offset {offset}")]
    Unrecognized {
        /// The offending text up to the next whitespace.
        fragment: String,
        /// Byte offset into the input.
        offset: usize,
    },

    /// The vocabulary could not be compiled into a matcher.
    #[error("invalid vocabulary: {0}")]
    Vocabulary(std::string::String),
}

/// Failures while reading or writing the table exchange format.
#[derive(Debug, Error)]
pub enum TableError {
    /// An action string is not `accept`, `S<n>` or `R<n>`.
    #[error("bad action {0:?}")]
    BadAction(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the table file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_action_lists_expected() {
        let err = ParseError::UnresolvedAction {
            state: 3,
            symbol: "+".into(),
            expected: vec!["id".into(), "(".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("state 3"));
        assert!(msg.contains("\"id\""));
    }

    #[test]
    fn json_error_maps_to_table_error() {
        let res: Result<u32, TableError> = serde_json::from_str::<u32>("nope").map_err(TableError::from);
        assert!(matches!(res.unwrap_err(), TableError::Json(_)));
    }

    fn _assert_send_sync_static<T: Send + Sync + 'static>() {}
    #[test]
    fn errors_are_send_sync_static() {
        _assert_send_sync_static::<ParseError>();
        _assert_send_sync_static::<TokenizeError>();
        _assert_send_sync_static::<TableError>();
    }
}
