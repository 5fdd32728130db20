//! FIRST and FOLLOW sets.
//!
//! Both are computed by monotone fixed-point iteration over the augmented
//! grammar: every pass only ever adds terminals (or nullability), so
//! repeating passes until nothing grows terminates, and the result does not
//! depend on the order productions are visited in.

use super::grammar::Augmented;
use super::parser::Symbol;
use std::collections::BTreeSet;

/// FIRST of a symbol or sequence: the terminals that can begin it, plus
/// whether it can derive the empty string (epsilon).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub terms: BTreeSet<usize>,
    pub nullable: bool,
}

impl FirstSet {
    pub fn contains_epsilon(&self) -> bool {
        self.nullable
    }

    /// Merges `other` into `self`; returns `true` if anything was added.
    fn absorb(&mut self, other: &FirstSet) -> bool {
        let before = self.terms.len();
        self.terms.extend(other.terms.iter().copied());
        let mut grew = self.terms.len() != before;
        if other.nullable && !self.nullable {
            self.nullable = true;
            grew = true;
        }
        grew
    }
}

/// FIRST and FOLLOW for every nonterminal of an augmented grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sets {
    /// FIRST(N), indexed by nonterminal.
    pub first: Vec<FirstSet>,
    /// FOLLOW(N), indexed by nonterminal.
    pub follow: Vec<BTreeSet<usize>>,
}

impl Sets {
    /// Empty sets, with the end-marker in FOLLOW of the synthetic start.
    pub fn new(g: &Augmented) -> Self {
        let n = g.nonterms().len();
        let mut follow = vec![BTreeSet::new(); n];
        follow[g.start].insert(g.end);
        Self {
            first: vec![FirstSet::default(); n],
            follow,
        }
    }

    /// Computes the sets to their fixed point.
    pub fn solve(g: &Augmented) -> Self {
        let mut sets = Self::new(g);
        let mut passes = 1;
        while sets.grow(g) {
            passes += 1;
        }
        log::debug!("FIRST/FOLLOW settled after {} passes", passes);
        sets
    }

    /// Runs one pass over every production; returns `true` if any set grew.
    pub fn grow(&mut self, g: &Augmented) -> bool {
        let first = self.grow_first(g);
        let follow = self.grow_follow(g);
        first || follow
    }

    fn grow_first(&mut self, g: &Augmented) -> bool {
        let mut grew = false;
        for prod in g.prods() {
            let rhs = self.first_of(&prod.rhs);
            grew |= self.first[prod.lhs].absorb(&rhs);
        }
        grew
    }

    fn grow_follow(&mut self, g: &Augmented) -> bool {
        let mut grew = false;
        for prod in g.prods() {
            for (i, sym) in prod.rhs.iter().enumerate() {
                let Symbol::NonTerm(n) = *sym else {
                    continue;
                };
                let rest = self.first_of(&prod.rhs[i + 1..]);
                let mut add = rest.terms;
                if rest.nullable {
                    add.extend(self.follow[prod.lhs].iter().copied());
                }
                for t in add {
                    grew |= self.follow[n].insert(t);
                }
            }
        }
        grew
    }

    /// FIRST of a symbol sequence under the current sets. The empty
    /// sequence is nullable with no terminals.
    pub fn first_of(&self, seq: &[Symbol]) -> FirstSet {
        let mut out = FirstSet {
            terms: BTreeSet::new(),
            nullable: true,
        };
        for sym in seq {
            match *sym {
                Symbol::Term(t) => {
                    out.terms.insert(t);
                    out.nullable = false;
                    break;
                }
                Symbol::NonTerm(n) => {
                    out.terms.extend(self.first[n].terms.iter().copied());
                    if !self.first[n].nullable {
                        out.nullable = false;
                        break;
                    }
                }
            }
        }
        out
    }

    /// FIRST of a single symbol.
    pub fn first_of_symbol(&self, sym: Symbol) -> FirstSet {
        self.first_of(std::slice::from_ref(&sym))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slr::grammar::Grammar;

    fn names(g: &Augmented, set: &BTreeSet<usize>) -> Vec<String> {
        set.iter()
            .map(|&t| g.terms().sym(t).unwrap().to_string())
            .collect()
    }

    fn nt(g: &Augmented, name: &str) -> usize {
        g.nonterms().idx(name).unwrap()
    }

    const EXPR: &str = "Start -> Add
Add -> Add + Factor
Add -> Factor
Factor -> Factor * Term
Factor -> Term
Term -> ( Add )
Term -> id";

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse(EXPR).unwrap().augment();
        let sets = Sets::solve(&g);
        for name in ["Start", "Add", "Factor", "Term"] {
            let first = &sets.first[nt(&g, name)];
            assert_eq!(names(&g, &first.terms), vec!["(", "id"]);
            assert!(!first.contains_epsilon());
        }
        assert_eq!(names(&g, &sets.follow[nt(&g, "Start")]), vec!["$"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "Add")]), vec!["+", ")", "$"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "Factor")]), vec!["+", "*", ")", "$"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "Term")]), vec!["+", "*", ")", "$"]);
    }

    #[test]
    fn nullable_chain() {
        let g = Grammar::parse("S -> A B c\nA -> a\nA ->\nB -> b\nB ->").unwrap().augment();
        let sets = Sets::solve(&g);
        let a = &sets.first[nt(&g, "A")];
        assert!(a.contains_epsilon());
        assert_eq!(names(&g, &a.terms), vec!["a"]);
        let s = &sets.first[nt(&g, "S")];
        assert!(!s.contains_epsilon());
        assert_eq!(names(&g, &s.terms), vec!["c", "a", "b"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "A")]), vec!["c", "b"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "B")]), vec!["c"]);
    }

    #[test]
    fn fully_nullable_rule_passes_follow_through() {
        let g = Grammar::parse("S -> x T\nT -> U V\nU ->\nV -> v\nV ->").unwrap().augment();
        let sets = Sets::solve(&g);
        assert!(sets.first[nt(&g, "T")].contains_epsilon());
        assert_eq!(names(&g, &sets.follow[nt(&g, "U")]), vec!["v", "$"]);
        assert_eq!(names(&g, &sets.follow[nt(&g, "V")]), vec!["$"]);
    }

    #[test]
    fn solving_is_idempotent() {
        for src in [EXPR, "S -> A B c\nA -> a\nA ->\nB -> b\nB ->"] {
            let g = Grammar::parse(src).unwrap().augment();
            let mut sets = Sets::solve(&g);
            let settled = sets.clone();
            assert!(!sets.grow(&g));
            assert_eq!(sets, settled);
        }
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = Grammar::parse(EXPR).unwrap().augment();
        let sets = Sets::solve(&g);
        let plus = g.terms().idx("+").unwrap();
        let first = sets.first_of_symbol(Symbol::Term(plus));
        assert_eq!(first.terms, BTreeSet::from([plus]));
        assert!(!first.nullable);
        assert!(sets.first_of(&[]).nullable);
    }
}
