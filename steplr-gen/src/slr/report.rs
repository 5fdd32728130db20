//! Human-readable dumps of the generator's intermediate results.
//!
//! Every writer emits a header line `<TAG>S,<count>` followed by one line per
//! entry prefixed with `<TAG>,`, so the output stays easy to grep.

use super::automaton::{Automaton, Conflict};
use super::grammar::Augmented;
use super::parser::Symbol;
use super::sets::Sets;
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Writes the productions of the augmented grammar.
///
/// # Output Format
/// ```text
/// PS,<number of productions>
///
/// P,<index>,<LHS> -> <RHS symbols>
/// ```
pub fn write_prods<W: Write>(out: &mut W, g: &Augmented) -> io::Result<()> {
    writeln!(out, "PS,{}\n", g.prods().len())?;
    for i in 0..g.prods().len() {
        writeln!(out, "P,{},{}", i, g.display_prod(i, None))?;
    }
    Ok(())
}

/// Writes every automaton state with its items, dot markers included,
/// followed by the state's actions and gotos.
pub fn write_states<W: Write>(out: &mut W, g: &Augmented, auto: &Automaton) -> io::Result<()> {
    writeln!(out, "CS,{}\n", auto.states.len())?;
    for (i, state) in auto.states.iter().enumerate() {
        for item in &state.items {
            writeln!(out, "C,{},{}", i, g.display_prod(item.prod, Some(item.dot)))?;
        }
        for (&t, action) in &state.actions {
            writeln!(out, "A,{},{},{}", i, g.name(Symbol::Term(t)), action)?;
        }
        for (&n, target) in &state.goto {
            writeln!(out, "G,{},{},{}", i, g.name(Symbol::NonTerm(n)), target)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_set<W: Write>(
    out: &mut W,
    label: &str,
    name: &str,
    nullable: bool,
    set: &BTreeSet<usize>,
    g: &Augmented,
) -> io::Result<()> {
    write!(out, "{},{},{{", label, name)?;
    if nullable {
        write!(out, "ε, ")?;
    }
    for &t in set {
        write!(out, "{}, ", g.name(Symbol::Term(t)))?;
    }
    writeln!(out, "}}")
}

/// Writes FIRST sets (with `ε` for nullable nonterminals), then FOLLOW sets.
pub fn write_first_follow<W: Write>(out: &mut W, g: &Augmented, sets: &Sets) -> io::Result<()> {
    for (n, name) in g.nonterms().iter().enumerate() {
        let first = &sets.first[n];
        write_set(out, "FIRST", name, first.nullable, &first.terms, g)?;
    }
    writeln!(out)?;
    for (n, name) in g.nonterms().iter().enumerate() {
        write_set(out, "FOLLOW", name, false, &sets.follow[n], g)?;
    }
    Ok(())
}

/// Writes the conflict list.
pub fn write_conflicts<W: Write>(out: &mut W, conflicts: &[Conflict]) -> io::Result<()> {
    writeln!(out, "XS,{}\n", conflicts.len())?;
    for c in conflicts {
        writeln!(out, "X,{}", c)?;
    }
    Ok(())
}

/// Writes all of the above, separated by blank lines.
pub fn write_report<W: Write>(
    out: &mut W,
    g: &Augmented,
    sets: &Sets,
    auto: &Automaton,
) -> io::Result<()> {
    write_prods(out, g)?;
    writeln!(out)?;
    write_first_follow(out, g, sets)?;
    writeln!(out)?;
    write_states(out, g, auto)?;
    write_conflicts(out, &auto.conflicts)
}
