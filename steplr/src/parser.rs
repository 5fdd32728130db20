//! The step-wise shift-reduce engine.
//!
//! A [`ParseContext`] executes a [`ParserTable`] against a token sequence one
//! instruction at a time. An instruction is a shift, a reduce, or accept.
//! A reduce is carried out in two phases (match-and-build, then goto-resolve)
//! so a front end can report progress inside it with [`ParseContext::tick`];
//! [`ParseContext::step`] always runs to the end of the current instruction.
//!
//! Only the boundary between instructions is a valid snapshot point. At that
//! boundary [`ParseContext::snapshot`] returns a deep copy of everything the
//! context owns; the table itself is shared.

use crate::ast::AstNode;
use crate::error::ParseError;
use crate::table::{Action, ParserTable};
use smartstring::alias::String;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// An element of the parse stack.
///
/// The stack starts with a state and alternates state, symbol, state, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StackElement {
    State(usize),
    /// A shifted terminal.
    Token(String),
    /// A nonterminal pushed after a reduction.
    Marker(String),
}

impl fmt::Display for StackElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackElement::State(s) => write!(f, "<{}>", s),
            StackElement::Token(t) => write!(f, "{}", t),
            StackElement::Marker(m) => write!(f, "{}", m),
        }
    }
}

/// A terminal waiting in the input, with its inspection marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputToken {
    pub symbol: String,
    /// Set once the engine has looked at this token as lookahead.
    pub inspected: bool,
}

impl InputToken {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            inspected: false,
        }
    }
}

/// Where the engine is inside the current instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Between instructions.
    AwaitingInstruction,
    /// A reduce by `rule` was chosen; nothing has been popped yet.
    MidReduceMatch { rule: usize },
    /// The right-hand side of `rule` was popped and its node built; the goto
    /// is still pending.
    MidReduceGoto { rule: usize },
    /// Accept was reached.
    Done,
}

/// What a single [`ParseContext::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    Shifted { symbol: String, state: usize },
    ReduceStarted { rule: usize },
    Matched { rule: usize },
    Reduced { rule: usize, symbol: String, state: usize },
    Accepted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    pub shifts: usize,
    pub reductions: usize,
}

/// A deep copy of a context taken at an instruction boundary.
///
/// Snapshots have no mutating methods; restoring clones out of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    table: Arc<ParserTable>,
    input: VecDeque<InputToken>,
    stack: Vec<StackElement>,
    forest: Vec<AstNode>,
    finished: bool,
    stats: ParserStats,
}

impl Snapshot {
    pub fn stack(&self) -> &[StackElement] {
        &self.stack
    }

    pub fn remaining(&self) -> &VecDeque<InputToken> {
        &self.input
    }

    pub fn forest(&self) -> &[AstNode] {
        &self.forest
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// State of one parse run.
#[derive(Debug)]
pub struct ParseContext {
    table: Arc<ParserTable>,
    input: VecDeque<InputToken>,
    stack: Vec<StackElement>,
    forest: Vec<AstNode>,
    phase: Phase,
    stats: ParserStats,
}

impl ParseContext {
    /// Starts a run over `tokens`. The tokens should end with the end-marker.
    pub fn new<I, S>(table: Arc<ParserTable>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table,
            input: tokens.into_iter().map(InputToken::new).collect(),
            stack: vec![StackElement::State(0)],
            forest: Vec::new(),
            phase: Phase::AwaitingInstruction,
            stats: ParserStats::default(),
        }
    }

    /// Rebuilds a context from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut ctx = Self::new(Arc::clone(&snapshot.table), Vec::<String>::new());
        ctx.restore(snapshot);
        ctx
    }

    pub fn table(&self) -> &ParserTable {
        &self.table
    }

    pub fn stack(&self) -> &[StackElement] {
        &self.stack
    }

    pub fn remaining(&self) -> &VecDeque<InputToken> {
        &self.input
    }

    /// Subtrees built so far, one per symbol on the stack.
    pub fn forest(&self) -> &[AstNode] {
        &self.forest
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// True between instructions, including after accept.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::AwaitingInstruction | Phase::Done)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Terminals with an action in the state at the top of the stack.
    pub fn expected(&self) -> Vec<String> {
        match self.stack.last() {
            Some(StackElement::State(s)) => self.table.expected(*s),
            _ => Vec::new(),
        }
    }

    /// Takes a deep copy of the context. Only allowed between instructions.
    pub fn snapshot(&self) -> Result<Snapshot, ParseError> {
        if !self.is_idle() {
            return Err(ParseError::NotIdle);
        }
        Ok(Snapshot {
            table: Arc::clone(&self.table),
            input: self.input.clone(),
            stack: self.stack.clone(),
            forest: self.forest.clone(),
            finished: self.is_finished(),
            stats: self.stats,
        })
    }

    /// Replaces the whole context with a copy of `snapshot`.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.table = Arc::clone(&snapshot.table);
        self.input = snapshot.input.clone();
        self.stack = snapshot.stack.clone();
        self.forest = snapshot.forest.clone();
        self.stats = snapshot.stats;
        self.phase = if snapshot.finished {
            Phase::Done
        } else {
            Phase::AwaitingInstruction
        };
    }

    /// Runs until accept.
    pub fn run(&mut self) -> Result<(), ParseError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }

    /// Executes the rest of the current instruction, or one whole instruction
    /// when idle, and returns it.
    pub fn step(&mut self) -> Result<Action, ParseError> {
        loop {
            match self.tick()? {
                Progress::Shifted { state, .. } => return Ok(Action::Shift(state)),
                Progress::Reduced { rule, .. } => return Ok(Action::Reduce(rule)),
                Progress::Accepted => return Ok(Action::Accept),
                Progress::ReduceStarted { .. } | Progress::Matched { .. } => {}
            }
        }
    }

    /// Advances by one phase.
    pub fn tick(&mut self) -> Result<Progress, ParseError> {
        let progress = match self.phase {
            Phase::Done => return Err(ParseError::Finished),
            Phase::AwaitingInstruction => self.dispatch()?,
            Phase::MidReduceMatch { rule } => {
                if let Err(err) = self.match_rule(rule) {
                    self.phase = Phase::AwaitingInstruction;
                    return Err(err);
                }
                self.phase = Phase::MidReduceGoto { rule };
                Progress::Matched { rule }
            }
            Phase::MidReduceGoto { rule } => {
                let (symbol, state) = self.resolve_goto(rule)?;
                self.phase = Phase::AwaitingInstruction;
                self.stats.reductions += 1;
                Progress::Reduced {
                    rule,
                    symbol,
                    state,
                }
            }
        };
        log::trace!("{:?}", progress);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", self.dump_stack());
        }
        Ok(progress)
    }

    /// Shifts the next input token and moves to `target`.
    pub fn shift(&mut self, target: usize) -> Result<(), ParseError> {
        self.ensure_idle()?;
        self.table.state(target)?;
        let token = self.input.pop_front().ok_or(ParseError::InputExhausted)?;
        self.stack.push(StackElement::Token(token.symbol.clone()));
        self.stack.push(StackElement::State(target));
        self.forest.push(AstNode::leaf(token.symbol));
        self.stats.shifts += 1;
        Ok(())
    }

    /// Reduces by the 1-based `rule` and follows the goto.
    pub fn reduce(&mut self, rule: usize) -> Result<(), ParseError> {
        self.ensure_idle()?;
        self.table.rule(rule)?;
        self.match_rule(rule)?;
        self.resolve_goto(rule)?;
        self.stats.reductions += 1;
        Ok(())
    }

    /// Renders the stack with the lookahead marked, e.g.
    /// `<0> ( <3> x <4>  <-  )`.
    pub fn dump_stack(&self) -> String {
        let mut output = String::new();
        for (i, elem) in self.stack.iter().enumerate() {
            if i > 0 {
                output.push(' ');
            }
            output.push_str(&elem.to_string());
        }
        if let Some(token) = self.input.front() {
            output.push_str(&format!("  <-  {}", token.symbol));
        }
        output
    }

    fn ensure_idle(&self) -> Result<(), ParseError> {
        match self.phase {
            Phase::AwaitingInstruction => Ok(()),
            Phase::Done => Err(ParseError::Finished),
            _ => Err(ParseError::NotIdle),
        }
    }

    fn top_state(&self) -> Result<usize, ParseError> {
        match self.stack.last() {
            Some(StackElement::State(s)) => Ok(*s),
            _ => Err(ParseError::StackUnderflow),
        }
    }

    fn dispatch(&mut self) -> Result<Progress, ParseError> {
        let state = self.top_state()?;
        self.table.state(state)?;
        let lookahead = self.input.front_mut().ok_or(ParseError::InputExhausted)?;
        lookahead.inspected = true;
        let symbol = lookahead.symbol.clone();
        match self.table.action(state, &symbol) {
            Some(Action::Accept) => {
                if self.input.len() > 1 {
                    return Err(ParseError::TrailingInput {
                        count: self.input.len() - 1,
                    });
                }
                self.input.pop_front();
                self.phase = Phase::Done;
                Ok(Progress::Accepted)
            }
            Some(Action::Shift(target)) => {
                self.shift(target)?;
                Ok(Progress::Shifted {
                    symbol,
                    state: target,
                })
            }
            Some(Action::Reduce(rule)) => {
                self.table.rule(rule)?;
                self.phase = Phase::MidReduceMatch { rule };
                Ok(Progress::ReduceStarted { rule })
            }
            None => Err(ParseError::UnresolvedAction {
                state,
                symbol,
                expected: self.table.expected(state),
            }),
        }
    }

    /// Pops the right-hand side of `rule` and replaces its subtrees with one
    /// node named for the left-hand side.
    ///
    /// The stack and forest are checked against the whole right-hand side
    /// before anything is popped, so a failed match leaves them untouched.
    fn match_rule(&mut self, rule: usize) -> Result<(), ParseError> {
        let table = Arc::clone(&self.table);
        let production = table.rule(rule)?;
        let n = production.matches.len();
        let len = self.stack.len();
        for (k, (position, expected)) in production.matches.iter().enumerate().rev().enumerate() {
            let found = match len.checked_sub(2 * k + 2).map(|i| &self.stack[i..i + 2]) {
                Some([StackElement::Token(s) | StackElement::Marker(s), StackElement::State(_)]) => s,
                _ => return Err(ParseError::StackUnderflow),
            };
            if found != expected {
                return Err(ParseError::ProductionMismatch {
                    rule,
                    position,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }
        if self.forest.len() < n {
            return Err(ParseError::StackUnderflow);
        }
        self.stack.truncate(len - 2 * n);
        let children = self.forest.split_off(self.forest.len() - n);
        self.forest
            .push(AstNode::new(production.result.clone(), children));
        Ok(())
    }

    /// Pushes the produced nonterminal and the goto target of the exposed
    /// state.
    fn resolve_goto(&mut self, rule: usize) -> Result<(String, usize), ParseError> {
        let symbol = self.table.rule(rule)?.result.clone();
        let exposed = self.top_state()?;
        let target = self
            .table
            .goto(exposed, &symbol)
            .ok_or_else(|| ParseError::UnresolvedGoto {
                state: exposed,
                symbol: symbol.clone(),
            })?;
        self.table.state(target)?;
        self.stack.push(StackElement::Marker(symbol.clone()));
        self.stack.push(StackElement::State(target));
        Ok((symbol, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_table_data::{BROKEN_TABLE, PARENS_TABLE};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parens() -> Arc<ParserTable> {
        Arc::new(ParserTable::from_json(PARENS_TABLE).unwrap())
    }

    fn broken() -> Arc<ParserTable> {
        Arc::new(ParserTable::from_json(BROKEN_TABLE).unwrap())
    }

    fn parens_ast() -> AstNode {
        AstNode::new(
            "Start",
            vec![AstNode::new(
                "S",
                vec![
                    AstNode::leaf("("),
                    AstNode::new("S", vec![AstNode::leaf("x")]),
                    AstNode::leaf(")"),
                ],
            )],
        )
    }

    #[test]
    fn runs_to_accept() {
        init_logger();
        let mut ctx = ParseContext::new(parens(), ["(", "x", ")", "$"]);
        ctx.run().unwrap();
        assert!(ctx.is_finished());
        assert!(ctx.remaining().is_empty());
        assert_eq!(ctx.forest(), &[parens_ast()]);
        assert_eq!(
            ctx.stack(),
            &[
                StackElement::State(0),
                StackElement::Marker("Start".into()),
                StackElement::State(1)
            ]
        );
        assert_eq!(ctx.stats(), ParserStats { shifts: 3, reductions: 3 });
    }

    #[test]
    fn steps_one_instruction_at_a_time() {
        init_logger();
        let mut ctx = ParseContext::new(parens(), ["(", "x", ")", "$"]);
        let mut trace = Vec::new();
        while !ctx.is_finished() {
            trace.push(ctx.step().unwrap());
            assert!(ctx.is_idle());
        }
        assert_eq!(
            trace,
            vec![
                Action::Shift(3),
                Action::Shift(4),
                Action::Reduce(3),
                Action::Shift(6),
                Action::Reduce(2),
                Action::Reduce(1),
                Action::Accept,
            ]
        );
        assert_eq!(ctx.step(), Err(ParseError::Finished));
    }

    #[test]
    fn reduce_is_split_into_phases() {
        init_logger();
        let mut ctx = ParseContext::new(parens(), ["x", "$"]);
        assert_eq!(
            ctx.tick().unwrap(),
            Progress::Shifted {
                symbol: "x".into(),
                state: 4
            }
        );
        assert_eq!(ctx.tick().unwrap(), Progress::ReduceStarted { rule: 3 });
        assert!(!ctx.is_idle());
        assert_eq!(ctx.snapshot(), Err(ParseError::NotIdle));
        assert_eq!(ctx.shift(4), Err(ParseError::NotIdle));
        assert_eq!(ctx.tick().unwrap(), Progress::Matched { rule: 3 });
        assert_eq!(ctx.phase(), Phase::MidReduceGoto { rule: 3 });
        assert_eq!(ctx.stack(), &[StackElement::State(0)]);
        assert_eq!(ctx.forest(), &[AstNode::new("S", vec![AstNode::leaf("x")])]);
        assert_eq!(
            ctx.tick().unwrap(),
            Progress::Reduced {
                rule: 3,
                symbol: "S".into(),
                state: 2
            }
        );
        assert!(ctx.is_idle());
    }

    #[test]
    fn step_finishes_a_started_reduce() {
        let mut ctx = ParseContext::new(parens(), ["x", "$"]);
        ctx.step().unwrap();
        ctx.tick().unwrap();
        ctx.tick().unwrap();
        assert_eq!(ctx.step().unwrap(), Action::Reduce(3));
        assert!(ctx.is_idle());
    }

    #[test]
    fn marks_inspected_tokens() {
        let mut ctx = ParseContext::new(parens(), ["x", "$"]);
        assert!(!ctx.remaining()[0].inspected);
        ctx.tick().unwrap();
        // "x" was shifted; "$" has not been looked at yet
        assert!(!ctx.remaining()[0].inspected);
        ctx.tick().unwrap();
        assert!(ctx.remaining()[0].inspected);
    }

    #[test]
    fn manual_shift_and_reduce() {
        let mut ctx = ParseContext::new(parens(), ["x", "$"]);
        ctx.shift(4).unwrap();
        ctx.reduce(3).unwrap();
        assert_eq!(
            ctx.stack(),
            &[
                StackElement::State(0),
                StackElement::Marker("S".into()),
                StackElement::State(2)
            ]
        );
        assert_eq!(ctx.shift(99), Err(ParseError::InvalidState { state: 99, count: 7 }));
    }

    #[test]
    fn out_of_range_rules_are_rejected() {
        let mut ctx = ParseContext::new(parens(), ["x", "$"]);
        assert_eq!(ctx.reduce(0), Err(ParseError::InvalidRule { rule: 0, count: 3 }));
        assert_eq!(ctx.reduce(4), Err(ParseError::InvalidRule { rule: 4, count: 3 }));
        assert_eq!(ctx.stack(), &[StackElement::State(0)]);
    }

    #[test]
    fn shift_without_input_fails() {
        let mut ctx = ParseContext::new(parens(), Vec::<&str>::new());
        assert_eq!(ctx.shift(4), Err(ParseError::InputExhausted));
        assert_eq!(ctx.step(), Err(ParseError::InputExhausted));
    }

    #[test]
    fn unresolved_action_reports_expected() {
        let mut ctx = ParseContext::new(parens(), [")", "$"]);
        assert_eq!(
            ctx.step(),
            Err(ParseError::UnresolvedAction {
                state: 0,
                symbol: ")".into(),
                expected: vec!["(".into(), "x".into()],
            })
        );
    }

    #[test]
    fn unresolved_goto() {
        let mut ctx = ParseContext::new(parens(), ["(", "x"]);
        ctx.shift(3).unwrap();
        ctx.shift(4).unwrap();
        ctx.reduce(3).unwrap();
        assert_eq!(
            ctx.reduce(1),
            Err(ParseError::UnresolvedGoto {
                state: 3,
                symbol: "Start".into()
            })
        );
    }

    #[test]
    fn production_mismatch() {
        let mut ctx = ParseContext::new(broken(), ["a", "$"]);
        assert_eq!(ctx.step().unwrap(), Action::Shift(2));
        assert_eq!(
            ctx.step(),
            Err(ParseError::ProductionMismatch {
                rule: 1,
                position: 1,
                expected: "b".into(),
                found: "a".into(),
            })
        );
    }

    #[test]
    fn failed_match_leaves_stack_intact() {
        let mut ctx = ParseContext::new(broken(), ["a", "$"]);
        ctx.step().unwrap();
        let stack = ctx.stack().to_vec();
        let forest = ctx.forest().to_vec();
        assert!(matches!(ctx.reduce(1), Err(ParseError::ProductionMismatch { .. })));
        assert_eq!(ctx.stack(), &stack[..]);
        assert_eq!(ctx.forest(), &forest[..]);

        assert_eq!(ctx.tick().unwrap(), Progress::ReduceStarted { rule: 1 });
        assert!(matches!(ctx.tick(), Err(ParseError::ProductionMismatch { .. })));
        assert!(ctx.is_idle());
        assert_eq!(ctx.stack(), &stack[..]);
        assert!(matches!(ctx.step(), Err(ParseError::ProductionMismatch { .. })));
        assert_eq!(ctx.stack(), &stack[..]);
    }

    #[test]
    fn input_after_end_marker_is_rejected() {
        let mut ctx = ParseContext::new(parens(), ["x", "$", "x"]);
        assert_eq!(ctx.run(), Err(ParseError::TrailingInput { count: 1 }));
        assert!(!ctx.is_finished());
        assert_eq!(ctx.remaining().len(), 2);
    }

    #[test]
    fn underflow_on_short_stack() {
        let mut ctx = ParseContext::new(parens(), ["$"]);
        assert_eq!(ctx.reduce(3), Err(ParseError::StackUnderflow));
    }

    #[test]
    fn shift_to_missing_state() {
        let mut ctx = ParseContext::new(broken(), ["a", "b", "$"]);
        ctx.step().unwrap();
        assert_eq!(ctx.step(), Err(ParseError::InvalidState { state: 9, count: 3 }));
    }

    #[test]
    fn input_exhausted_before_accept() {
        let mut ctx = ParseContext::new(broken(), ["a"]);
        ctx.step().unwrap();
        assert_eq!(ctx.run(), Err(ParseError::InputExhausted));
    }

    #[test]
    fn snapshot_is_independent() {
        init_logger();
        let mut ctx = ParseContext::new(parens(), ["(", "x", ")", "$"]);
        ctx.step().unwrap();
        ctx.step().unwrap();
        let snap = ctx.snapshot().unwrap();
        let before = snap.clone();

        ctx.run().unwrap();
        assert_eq!(snap, before);
        assert_eq!(snap.stack().len(), 5);
        assert!(!snap.is_finished());

        ctx.restore(&snap);
        assert_eq!(ctx.snapshot().unwrap(), snap);
        assert!(!ctx.is_finished());

        ctx.run().unwrap();
        assert_eq!(ctx.forest(), &[parens_ast()]);
        assert_eq!(snap, before);
    }

    #[test]
    fn restore_round_trip() {
        let mut ctx = ParseContext::new(parens(), ["(", "x", ")", "$"]);
        ctx.step().unwrap();
        let snap = ctx.snapshot().unwrap();
        let mut copy = ParseContext::from_snapshot(&snap);
        assert_eq!(copy.stack(), ctx.stack());
        assert_eq!(copy.forest(), ctx.forest());
        assert_eq!(copy.remaining(), ctx.remaining());

        copy.step().unwrap();
        assert_ne!(copy.stack(), ctx.stack());
        assert_eq!(ctx.snapshot().unwrap(), snap);
    }

    #[test]
    fn stepping_matches_running() {
        let mut stepped = ParseContext::new(parens(), ["(", "(", "x", ")", ")", "$"]);
        let mut ran = ParseContext::new(parens(), ["(", "(", "x", ")", ")", "$"]);
        while !stepped.is_finished() {
            stepped.step().unwrap();
        }
        ran.run().unwrap();
        assert_eq!(stepped.snapshot().unwrap(), ran.snapshot().unwrap());
    }

    #[test]
    fn dump_marks_lookahead() {
        let mut ctx = ParseContext::new(parens(), ["(", "x", ")", "$"]);
        ctx.step().unwrap();
        assert_eq!(ctx.dump_stack(), "<0> ( <3>  <-  x");
    }
}
