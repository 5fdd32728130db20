//! SLR(1) table generation.
//!
//! A grammar is loaded into a [`Grammar`], augmented with `S' -> S`, and run
//! through FIRST/FOLLOW computation ([`Sets`]), LR(0) automaton construction
//! with SLR(1) action registration ([`Automaton`]) and finally [`emit`], which
//! produces the [`steplr::ParserTable`] the engine executes. [`build`] and
//! [`generate`] chain these steps.

mod automaton;
mod emit;
mod generate;
mod grammar;
mod lexer;
mod parser;
mod report;
mod sets;
mod symtab;

pub use automaton::{
    Automaton, AutomatonState, Conflict, ConflictKind, Item, Kernel, advance, closure,
};
pub use emit::emit;
pub use generate::{Build, build, generate};
pub use grammar::{Augmented, Grammar, GrammarError};
pub use lexer::SEPARATOR;
pub use parser::{Production, Symbol};
pub use report::{write_conflicts, write_first_follow, write_prods, write_report, write_states};
pub use sets::{FirstSet, Sets};
pub use symtab::Symtab;
