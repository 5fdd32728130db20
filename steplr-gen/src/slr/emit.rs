use super::automaton::Automaton;
use super::grammar::Augmented;
use super::parser::Symbol;
use smartstring::alias::String;
use steplr::{ParserTable, Rule, State};

/// Materializes the finished automaton as a [`ParserTable`].
///
/// Symbol indices become names, the synthetic start rule and nonterminal are
/// left out, and production `n` of the augmented grammar becomes rule id `n`.
pub fn emit(g: &Augmented, auto: &Automaton, name: Option<&str>) -> ParserTable {
    let terminals = g.terms().names();
    let nonterminals = g
        .nonterms()
        .iter()
        .enumerate()
        .filter(|&(n, _)| n != g.start)
        .map(|(_, s)| String::from(s))
        .collect();

    let rules = g.prods()[1..]
        .iter()
        .map(|p| {
            Rule::new(
                g.name(Symbol::NonTerm(p.lhs)),
                p.rhs.iter().map(|&sym| String::from(g.name(sym))).collect(),
            )
        })
        .collect();

    let states = auto
        .states
        .iter()
        .map(|s| State {
            actions: s
                .actions
                .iter()
                .map(|(&t, &action)| (String::from(g.name(Symbol::Term(t))), action))
                .collect(),
            goto: s
                .goto
                .iter()
                .map(|(&n, &target)| (String::from(g.name(Symbol::NonTerm(n))), target))
                .collect(),
        })
        .collect();

    ParserTable {
        name: name.map(String::from),
        terminals,
        nonterminals,
        rules,
        states,
    }
}
