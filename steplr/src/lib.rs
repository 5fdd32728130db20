//! Step-wise, reversible SLR(1) parse engine.
//!
//! `steplr` executes a precomputed SLR parse table (see the `steplr-gen`
//! crate) against a token sequence one instruction at a time, building an
//! abstract syntax tree in lockstep with the reductions. Every instruction
//! boundary can be snapshotted, which makes the run reversible.
//!
//! # Components
//!
//! - [`ParserTable`]: the JSON-exchangeable action/goto table.
//! - [`ParseContext`]: the resumable engine over one token sequence.
//! - [`Session`] and [`History`]: per-run driver with step-back.
//! - [`Tokenizer`]: a toy tokenizer over a table's terminal vocabulary.
//! - [`AstNode`]: the tree handed to renderers.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use steplr::{ParseContext, ParserTable, Tokenizer};
//!
//! let json = r#"{
//!   "rules": [{ "match": ["x"], "result": "S" }],
//!   "states": [
//!     { "actions": { "x": "S2" }, "goto": { "S": 1 } },
//!     { "actions": { "$": "accept" } },
//!     { "actions": { "$": "R1" } }
//!   ]
//! }"#;
//! let table = Arc::new(ParserTable::from_json(json).unwrap());
//! let tokens = Tokenizer::new(["x"]).unwrap().tokenize("x $").unwrap();
//! let mut ctx = ParseContext::new(table, tokens);
//! ctx.run().unwrap();
//! assert_eq!(ctx.forest()[0].name.as_str(), "S");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod table;

#[cfg(test)]
mod test_table_data;

pub use crate::ast::{AstNode, Extent};
pub use crate::error::{ParseError, TableError, TokenizeError};
pub use crate::lexer::Tokenizer;
pub use crate::parser::{
    InputToken, ParseContext, ParserStats, Phase, Progress, Snapshot, StackElement,
};
pub use crate::session::{History, Session};
pub use crate::table::{ACCEPT, Action, END_MARKER, ParserTable, Rule, State};
