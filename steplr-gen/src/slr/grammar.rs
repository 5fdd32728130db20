//! The grammar model: vocabularies plus productions.

use super::lexer::{LexContext, Lexer};
use super::parser::{self, Production, Symbol};
use super::symtab::Symtab;
use chumsky::Parser;
use smartstring::alias::String;
use steplr::END_MARKER;
use thiserror::Error;

/// Build-time failures while loading a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A line is not of the form `Nonterminal -> terms...`.
    #[error("malformed production on line {line}: {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        text: String,
    },

    /// The source contains no productions.
    #[error("grammar has no productions")]
    Empty,

    /// A nonterminal is used but never defined.
    #[error("nonterminal {name:?} has no productions")]
    Undefined { name: String },
}

/// A grammar as written, before augmentation.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub terms: Symtab,
    pub nonterms: Symtab,
    pub prods: Vec<Production>,
}

impl Grammar {
    /// Loads a grammar from its line-oriented source. Blank lines are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut ctx = LexContext::default();
        let mut prods = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = || GrammarError::Malformed {
                line: i + 1,
                text: line.trim().into(),
            };
            let toks = Lexer::tokenize_line(line, &mut ctx).ok_or_else(malformed)?;
            let prod = parser::parser()
                .parse(&toks[..])
                .into_result()
                .map_err(|_| malformed())?;
            prods.push(prod);
        }
        if prods.is_empty() {
            return Err(GrammarError::Empty);
        }
        for (n, name) in ctx.nonterms.iter().enumerate() {
            if !prods.iter().any(|p| p.lhs == n) {
                return Err(GrammarError::Undefined { name: name.into() });
            }
        }
        log::debug!(
            "grammar: {} productions, {} terminals, {} nonterminals",
            prods.len(),
            ctx.terms.len(),
            ctx.nonterms.len()
        );
        Ok(Self {
            terms: ctx.terms,
            nonterms: ctx.nonterms,
            prods,
        })
    }

    /// The start symbol: left-hand side of the first production.
    pub fn start(&self) -> usize {
        self.prods[0].lhs
    }

    /// Adds the synthetic rule `S' -> S` as production 0 and the end-marker
    /// terminal.
    pub fn augment(mut self) -> Augmented {
        let original = self.start();
        let mut name = String::from(self.nonterms.sym(original).unwrap_or("S"));
        name.push('\'');
        while self.nonterms.idx(&name).is_some() {
            name.push('\'');
        }
        let start = self.nonterms.add(&name);
        let end = self.terms.add(END_MARKER);
        self.prods.insert(
            0,
            Production {
                lhs: start,
                rhs: vec![Symbol::NonTerm(original)],
            },
        );
        Augmented {
            grammar: self,
            start,
            end,
        }
    }
}

/// A grammar extended with `S' -> S` (production 0) and the end-marker.
///
/// Production indices double as the 1-based rule ids of the emitted table.
#[derive(Debug, Clone)]
pub struct Augmented {
    pub grammar: Grammar,
    /// The synthetic start nonterminal.
    pub start: usize,
    /// The end-marker terminal.
    pub end: usize,
}

impl Augmented {
    pub fn prods(&self) -> &[Production] {
        &self.grammar.prods
    }

    pub fn terms(&self) -> &Symtab {
        &self.grammar.terms
    }

    pub fn nonterms(&self) -> &Symtab {
        &self.grammar.nonterms
    }

    pub fn name(&self, sym: Symbol) -> &str {
        let name = match sym {
            Symbol::Term(t) => self.grammar.terms.sym(t),
            Symbol::NonTerm(n) => self.grammar.nonterms.sym(n),
        };
        name.unwrap_or("?")
    }

    /// Renders production `prod` with a dot before position `dot`, or without
    /// a dot when `dot` is `None`.
    pub fn display_prod(&self, prod: usize, dot: Option<usize>) -> String {
        let p = &self.grammar.prods[prod];
        let mut out = String::from(self.name(Symbol::NonTerm(p.lhs)));
        out.push_str(" ->");
        for (i, &sym) in p.rhs.iter().enumerate() {
            if dot == Some(i) {
                out.push_str(" .");
            }
            out.push(' ');
            out.push_str(self.name(sym));
        }
        if dot == Some(p.rhs.len()) {
            out.push_str(" .");
        }
        out
    }
}
