//! SLR(1) parse table generator.
//!
//! `steplr-gen` reads a plain, line-oriented grammar
//!
//! ```text
//! Start -> Add
//! Add -> Add + Factor
//! Add -> Factor
//! Factor -> Factor * Term
//! Factor -> Term
//! Term -> ( Add )
//! Term -> id
//! ```
//!
//! where a term starting with an uppercase letter is a nonterminal and anything
//! else is a terminal, and produces the JSON [`steplr::ParserTable`] that the
//! `steplr` engine steps through. Conflicts are reported, not fatal: the first
//! action written to a cell wins.
//!
//! The `steplr-gen` binary (behind the default `cli` feature) wraps
//! [`slr::generate`].

pub mod slr;

pub use slr::{Build, GrammarError, build, generate};
