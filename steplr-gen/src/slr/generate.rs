use super::automaton::{Automaton, Conflict};
use super::emit::emit;
use super::grammar::{Augmented, Grammar, GrammarError};
use super::sets::Sets;
use anyhow::{Context, Result};
use std::path::Path;
use steplr::ParserTable;

/// Everything produced while turning a grammar into a table.
#[derive(Debug)]
pub struct Build {
    pub table: ParserTable,
    pub grammar: Augmented,
    pub sets: Sets,
    pub automaton: Automaton,
}

impl Build {
    pub fn conflicts(&self) -> &[Conflict] {
        &self.automaton.conflicts
    }
}

/// Builds an SLR(1) table from grammar source text.
///
/// A malformed grammar fails here, before any set or state is computed.
/// Conflicts do not fail the build; they are logged and kept in the result.
pub fn build(text: &str, name: Option<&str>) -> Result<Build, GrammarError> {
    let grammar = Grammar::parse(text)?.augment();
    let sets = Sets::solve(&grammar);
    let automaton = Automaton::build(&grammar, &sets);
    let table = emit(&grammar, &automaton, name);
    Ok(Build {
        table,
        grammar,
        sets,
        automaton,
    })
}

/// Builds a table from a grammar file and writes it as JSON to `out_path`.
///
/// Without an explicit `name` the table is named after the grammar file's
/// stem.
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(
    grammar_path: P,
    out_path: Q,
    name: Option<&str>,
) -> Result<Build> {
    let grammar_path = grammar_path.as_ref();
    let out_path = out_path.as_ref();
    let text = std::fs::read_to_string(grammar_path)
        .with_context(|| format!("can't read grammar {:?}", grammar_path))?;
    let stem = grammar_path.file_stem().and_then(|s| s.to_str());
    let build = build(&text, name.or(stem))
        .with_context(|| format!("can't load grammar {:?}", grammar_path))?;
    build
        .table
        .save(out_path)
        .with_context(|| format!("can't write table {:?}", out_path))?;
    log::debug!(
        "wrote {} states, {} rules to {:?}",
        build.table.states.len(),
        build.table.rules.len(),
        out_path
    );
    Ok(build)
}
