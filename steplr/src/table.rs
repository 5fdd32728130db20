//! The parse table exchange format.
//!
//! A [`ParserTable`] is produced once by the generator (or loaded from JSON)
//! and is read-only afterwards. The engine shares it behind an `Arc` and never
//! copies it.
//!
//! The JSON layout is
//!
//! ```text
//! {
//!   "name": "expr",
//!   "terminals": ["+", "id", "$"],
//!   "nonterminals": ["Start", "Add"],
//!   "rules": [{ "match": ["Add"], "result": "Start" }, ...],
//!   "states": [{ "actions": { "id": "S4", "$": "accept" }, "goto": { "Add": 2 } }, ...]
//! }
//! ```
//!
//! Rules are numbered from 1 in reduce actions: `R1` reduces by `rules[0]`.

use crate::error::{ParseError, TableError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The end-of-input terminal.
pub const END_MARKER: &str = "$";

/// The action string for accept.
pub const ACCEPT: &str = "accept";

static ACTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([SR])(\d+)$").unwrap());

/// A single action-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "std::string::String", into = "std::string::String")]
pub enum Action {
    /// Input accepted; the parse is complete.
    Accept,
    /// Push the lookahead and move to the state.
    Shift(usize),
    /// Reduce by the 1-based rule id.
    Reduce(usize),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Accept => f.write_str(ACCEPT),
            Action::Shift(s) => write!(f, "S{}", s),
            Action::Reduce(r) => write!(f, "R{}", r),
        }
    }
}

impl FromStr for Action {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ACCEPT {
            return Ok(Action::Accept);
        }
        let caps = ACTION_RE
            .captures(s)
            .ok_or_else(|| TableError::BadAction(s.into()))?;
        let n: usize = caps[2]
            .parse()
            .map_err(|_| TableError::BadAction(s.into()))?;
        match &caps[1] {
            "S" => Ok(Action::Shift(n)),
            _ => Ok(Action::Reduce(n)),
        }
    }
}

impl TryFrom<std::string::String> for Action {
    type Error = TableError;

    fn try_from(s: std::string::String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Action> for std::string::String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

/// A production `result -> match...` as stored in the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Right-hand side symbols, left to right. Empty for an epsilon rule.
    #[serde(rename = "match")]
    pub matches: Vec<String>,
    /// Left-hand side nonterminal.
    pub result: String,
}

impl Rule {
    pub fn new(result: impl Into<String>, matches: Vec<String>) -> Self {
        Self {
            matches,
            result: result.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.result)?;
        for sym in &self.matches {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// One row of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Terminal → action.
    #[serde(default)]
    pub actions: BTreeMap<String, Action>,
    /// Nonterminal → target state.
    #[serde(default)]
    pub goto: BTreeMap<String, usize>,
}

/// A complete SLR parse table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserTable {
    /// Display name of the table, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Terminal vocabulary, end-marker last.
    #[serde(default)]
    pub terminals: Vec<String>,
    /// Nonterminal vocabulary, without the synthetic start symbol.
    #[serde(default)]
    pub nonterminals: Vec<String>,
    /// Rules; rule id `n` is `rules[n - 1]`.
    pub rules: Vec<Rule>,
    /// States in discovery order; state 0 is the start state.
    pub states: Vec<State>,
}

impl ParserTable {
    /// Returns the rule with the given 1-based id.
    pub fn rule(&self, id: usize) -> Result<&Rule, ParseError> {
        id.checked_sub(1)
            .and_then(|i| self.rules.get(i))
            .ok_or(ParseError::InvalidRule {
                rule: id,
                count: self.rules.len(),
            })
    }

    /// Returns the state row at `index`.
    pub fn state(&self, index: usize) -> Result<&State, ParseError> {
        self.states.get(index).ok_or(ParseError::InvalidState {
            state: index,
            count: self.states.len(),
        })
    }

    /// Looks up the action for `terminal` in `state`.
    pub fn action(&self, state: usize, terminal: &str) -> Option<Action> {
        self.states.get(state)?.actions.get(terminal).copied()
    }

    /// Looks up the goto target for `nonterminal` in `state`.
    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.states.get(state)?.goto.get(nonterminal).copied()
    }

    /// Terminals that have an action in `state`.
    pub fn expected(&self, state: usize) -> Vec<String> {
        self.states
            .get(state)
            .map(|s| s.actions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Parses a table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<std::string::String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a JSON table from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the table as JSON to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_table_data::PARENS_TABLE;

    #[test]
    fn action_strings() {
        assert_eq!("accept".parse::<Action>().unwrap(), Action::Accept);
        assert_eq!("S12".parse::<Action>().unwrap(), Action::Shift(12));
        assert_eq!("R3".parse::<Action>().unwrap(), Action::Reduce(3));
        assert_eq!(Action::Shift(4).to_string(), "S4");
        assert!(matches!("X1".parse::<Action>(), Err(TableError::BadAction(_))));
        assert!(matches!("S".parse::<Action>(), Err(TableError::BadAction(_))));
        assert!(matches!("R-1".parse::<Action>(), Err(TableError::BadAction(_))));
    }

    #[test]
    fn loads_fixture() {
        let table = ParserTable::from_json(PARENS_TABLE).unwrap();
        assert_eq!(table.name.as_deref(), Some("parens"));
        assert_eq!(table.rules.len(), 3);
        assert_eq!(table.action(0, "x"), Some(Action::Shift(4)));
        assert_eq!(table.action(1, "$"), Some(Action::Accept));
        assert_eq!(table.goto(0, "S"), Some(2));
        assert_eq!(table.action(0, "+"), None);
    }

    #[test]
    fn rule_ids_are_one_based() {
        let table = ParserTable::from_json(PARENS_TABLE).unwrap();
        assert_eq!(table.rule(1).unwrap().result.as_str(), "Start");
        assert!(matches!(table.rule(0), Err(ParseError::InvalidRule { rule: 0, count: 3 })));
        assert!(matches!(table.rule(4), Err(ParseError::InvalidRule { rule: 4, count: 3 })));
    }

    #[test]
    fn bad_action_rejected_on_load() {
        let json = r#"{ "rules": [], "states": [{ "actions": { "x": "Q1" }, "goto": {} }] }"#;
        assert!(ParserTable::from_json(json).is_err());
    }

    #[test]
    fn json_round_trip_keeps_table() {
        let table = ParserTable::from_json(PARENS_TABLE).unwrap();
        let again = ParserTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(table, again);
    }
}
