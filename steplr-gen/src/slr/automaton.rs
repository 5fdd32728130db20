// LR(0) item machinery and SLR(1) action registration.

use super::grammar::Augmented;
use super::parser::{Production, Symbol};
use super::sets::Sets;
use indexmap::{IndexMap, IndexSet};
use smartstring::alias::String;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use steplr::Action;

/// Represents an LR(0) item consisting of a production index and a dot position.
///
/// The dot counts right-hand side symbols already recognized: for production
/// `Add -> Add + Factor`, `dot == 1` is the item `Add -> Add . + Factor`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The index of the production in the augmented grammar.
    pub prod: usize,

    /// The position of the dot within the production's right-hand side.
    pub dot: usize,
}

impl Item {
    /// The symbol right after the dot, or `None` for a complete item.
    pub fn next(&self, prods: &[Production]) -> Option<Symbol> {
        prods[self.prod].rhs.get(self.dot).copied()
    }

    pub fn is_complete(&self, prods: &[Production]) -> bool {
        self.dot >= prods[self.prod].rhs.len()
    }
}

/// The items a state is created from. Two states are the same state exactly
/// when their kernels are equal.
pub type Kernel = BTreeSet<Item>;

/// Computes the LR(0) closure of a kernel.
///
/// For every item whose dot stands before a nonterminal, the items
/// `N -> . rhs` of all productions of that nonterminal are added, repeating
/// until nothing new appears. The result lists the kernel first, then the
/// added items in the order they were discovered.
pub fn closure(kernel: &Kernel, prods: &[Production]) -> IndexSet<Item> {
    let mut items: IndexSet<Item> = kernel.iter().copied().collect();
    let mut i = 0;
    while i < items.len() {
        if let Some(Symbol::NonTerm(n)) = items[i].next(prods) {
            for (j, p) in prods.iter().enumerate() {
                if p.lhs == n {
                    items.insert(Item { prod: j, dot: 0 });
                }
            }
        }
        i += 1;
    }
    items
}

/// The kernel reached from `items` on `sym`: every item with its dot before
/// `sym`, advanced by one. Empty when there is no transition on `sym`.
pub fn advance(items: &IndexSet<Item>, sym: Symbol, prods: &[Production]) -> Kernel {
    items
        .iter()
        .filter(|item| item.next(prods) == Some(sym))
        .map(|item| Item {
            prod: item.prod,
            dot: item.dot + 1,
        })
        .collect()
}

/// One state of the LR(0) automaton with its SLR(1) table row.
#[derive(Clone, Debug)]
pub struct AutomatonState {
    pub kernel: Kernel,
    /// `closure(kernel)`, kernel items first.
    pub items: IndexSet<Item>,
    /// Transitions in discovery order.
    pub edges: IndexMap<Symbol, usize>,
    /// Terminal index → action.
    pub actions: IndexMap<usize, Action>,
    /// Nonterminal index → target state.
    pub goto: IndexMap<usize, usize>,
}

impl AutomatonState {
    fn new(kernel: Kernel, prods: &[Production]) -> Self {
        let items = closure(&kernel, prods);
        Self {
            kernel,
            items,
            edges: IndexMap::new(),
            actions: IndexMap::new(),
            goto: IndexMap::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::ShiftReduce => f.write_str("shift/reduce"),
            ConflictKind::ReduceReduce => f.write_str("reduce/reduce"),
        }
    }
}

/// A second, different action for an occupied (state, terminal) cell.
/// The cell keeps the action written first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub terminal: String,
    pub kept: Action,
    pub rejected: Action,
    pub kind: ConflictKind,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} conflict in state {} on {:?}: kept {}, rejected {}",
            self.kind, self.state, self.terminal, self.kept, self.rejected
        )
    }
}

/// The canonical LR(0) collection with SLR(1) actions filled in.
#[derive(Clone, Debug)]
pub struct Automaton {
    /// States in discovery order; state 0 is the start state.
    pub states: Vec<AutomatonState>,
    pub conflicts: Vec<Conflict>,
}

impl Automaton {
    /// Builds the automaton breadth-first from `S' -> . S`.
    ///
    /// Candidate kernels are looked up by value, so a kernel reached along
    /// several paths yields one state. Actions are registered while each state
    /// is dequeued, walking its items in closure order.
    pub fn build(g: &Augmented, sets: &Sets) -> Self {
        let prods = g.prods();
        let start = Kernel::from([Item { prod: 0, dot: 0 }]);
        let mut index: HashMap<Kernel, usize> = HashMap::from([(start.clone(), 0)]);
        let mut auto = Self {
            states: vec![AutomatonState::new(start, prods)],
            conflicts: Vec::new(),
        };

        let mut q = 0;
        while q < auto.states.len() {
            let symbols: IndexSet<Symbol> = auto.states[q]
                .items
                .iter()
                .filter_map(|item| item.next(prods))
                .collect();
            for sym in symbols {
                let kernel = advance(&auto.states[q].items, sym, prods);
                let target = match index.get(&kernel) {
                    Some(&target) => target,
                    None => {
                        let target = auto.states.len();
                        index.insert(kernel.clone(), target);
                        auto.states.push(AutomatonState::new(kernel, prods));
                        target
                    }
                };
                auto.states[q].edges.insert(sym, target);
            }

            let items: Vec<Item> = auto.states[q].items.iter().copied().collect();
            for item in items {
                match item.next(prods) {
                    Some(sym @ Symbol::Term(t)) => {
                        if let Some(&target) = auto.states[q].edges.get(&sym) {
                            auto.register(g, q, t, Action::Shift(target));
                        }
                    }
                    Some(sym @ Symbol::NonTerm(n)) => {
                        if let Some(&target) = auto.states[q].edges.get(&sym) {
                            auto.states[q].goto.insert(n, target);
                        }
                    }
                    None if item.prod == 0 => auto.register(g, q, g.end, Action::Accept),
                    None => {
                        for &t in &sets.follow[prods[item.prod].lhs] {
                            auto.register(g, q, t, Action::Reduce(item.prod));
                        }
                    }
                }
            }
            q += 1;
        }

        log::debug!(
            "automaton: {} states, {} conflicts",
            auto.states.len(),
            auto.conflicts.len()
        );
        auto
    }

    fn register(&mut self, g: &Augmented, state: usize, term: usize, action: Action) {
        let kept = match self.states[state].actions.get(&term) {
            None => {
                self.states[state].actions.insert(term, action);
                return;
            }
            Some(&kept) if kept == action => return,
            Some(&kept) => kept,
        };
        let kind = if matches!(kept, Action::Shift(_)) || matches!(action, Action::Shift(_)) {
            ConflictKind::ShiftReduce
        } else {
            ConflictKind::ReduceReduce
        };
        let conflict = Conflict {
            state,
            terminal: g.name(Symbol::Term(term)).into(),
            kept,
            rejected: action,
            kind,
        };
        log::warn!("{}", conflict);
        self.conflicts.push(conflict);
    }
}
