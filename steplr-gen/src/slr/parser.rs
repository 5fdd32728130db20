use super::lexer::Token;
use chumsky::prelude::*;

/// A grammar symbol, by vocabulary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Term(usize),
    NonTerm(usize),
}

/// `lhs -> rhs...`; an empty `rhs` is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: usize,
    pub rhs: Vec<Symbol>,
}

/// Parses the tokens of a single grammar line.
pub fn parser<'a>() -> impl Parser<'a, &'a [Token], Production> {
    let symbol = select! {
        Token::Term(t) => Symbol::Term(t),
        Token::NonTerm(n) => Symbol::NonTerm(n),
    }
    .labelled("symbol");

    let left = select! {
        Token::NonTerm(n) => n,
    }
    .labelled("left");

    let arrow = select! { Token::Arrow => () }.labelled("arrow");

    left.then_ignore(arrow)
        .then(symbol.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(lhs, rhs)| Production { lhs, rhs })
}
