//! Grammar lexer.
//!
//! Grammar sources are line oriented: each non-blank line is one production
//! `Nonterminal -> term1 term2 ...`. A line is first split at its separator,
//! then both halves are tokenized by a [`logos`] lexer that classifies every
//! whitespace-delimited term: a term starting with an uppercase or titlecase
//! letter (any script) is a nonterminal, anything else is a terminal.
//!
//! Names are interned into the [`LexContext`] as they are seen, so symbol
//! indices follow first appearance in the source.

use super::symtab::Symtab;
use logos::Logos;

/// The production separator.
pub const SEPARATOR: &str = "->";

/// Vocabularies filled while lexing a grammar.
#[derive(Default, Debug)]
pub struct LexContext {
    /// Terminal vocabulary.
    pub terms: Symtab,

    /// Nonterminal vocabulary.
    pub nonterms: Symtab,
}

/// Tokens handed to the grammar parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A nonterminal (e.g. `Add`).
    NonTerm(usize),

    /// The production separator (`->`).
    Arrow,

    /// A terminal (e.g. `id`, `+`).
    Term(usize),
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum LogosToken {
    /// Identifier starting with an uppercase letter.
    #[regex(r"[\p{Lu}\p{Lt}][^\s]*")]
    Var,

    /// Any other run of non-whitespace characters.
    #[regex(r"[^\s\p{Lu}\p{Lt}][^\s]*")]
    Atom,
}

/// Line lexer for grammar sources.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, LogosToken>,
}

impl<'source> Lexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }

    /// Returns the next symbol token, interning its name into `ctx`.
    pub fn next_token(&mut self, ctx: &mut LexContext) -> Option<Token> {
        let kind = self.inner.next()?;
        let slice = self.inner.slice();
        Some(match kind {
            Ok(LogosToken::Var) => Token::NonTerm(ctx.nonterms.add(slice)),
            // every non-whitespace byte starts a Var or an Atom, so an error
            // can only be a stray character; treat it as a terminal
            Ok(LogosToken::Atom) | Err(()) => Token::Term(ctx.terms.add(slice)),
        })
    }

    /// Tokenizes one grammar line.
    ///
    /// Returns `None` when the line has no separator.
    pub fn tokenize_line(line: &'source str, ctx: &mut LexContext) -> Option<Vec<Token>> {
        let (lhs, rhs) = line.split_once(SEPARATOR)?;
        let mut out = Vec::new();
        let mut lex = Lexer::new(lhs);
        while let Some(tok) = lex.next_token(ctx) {
            out.push(tok);
        }
        out.push(Token::Arrow);
        let mut lex = Lexer::new(rhs);
        while let Some(tok) = lex.next_token(ctx) {
            out.push(tok);
        }
        Some(out)
    }
}
