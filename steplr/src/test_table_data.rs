//! Hand-built tables used by the unit tests.

/// SLR table for
///
/// ```text
/// Start -> S
/// S -> ( S )
/// S -> x
/// ```
pub const PARENS_TABLE: &str = r#"{
  "name": "parens",
  "terminals": ["(", ")", "x", "$"],
  "nonterminals": ["Start", "S"],
  "rules": [
    { "match": ["S"], "result": "Start" },
    { "match": ["(", "S", ")"], "result": "S" },
    { "match": ["x"], "result": "S" }
  ],
  "states": [
    { "actions": { "(": "S3", "x": "S4" }, "goto": { "Start": 1, "S": 2 } },
    { "actions": { "$": "accept" }, "goto": {} },
    { "actions": { "$": "R1" }, "goto": {} },
    { "actions": { "(": "S3", "x": "S4" }, "goto": { "S": 5 } },
    { "actions": { "$": "R3", ")": "R3" }, "goto": {} },
    { "actions": { ")": "S6" }, "goto": {} },
    { "actions": { "$": "R2", ")": "R2" }, "goto": {} }
  ]
}"#;

/// A table whose rule 1 disagrees with what state 1 shifts, for exercising
/// engine failures.
///
/// ```text
/// Start -> a b
/// ```
///
/// State 2 reduces by rule 1 on `$` although only `a` was shifted.
pub const BROKEN_TABLE: &str = r#"{
  "name": "broken",
  "terminals": ["a", "b", "$"],
  "nonterminals": ["Start"],
  "rules": [
    { "match": ["a", "b"], "result": "Start" }
  ],
  "states": [
    { "actions": { "a": "S2" }, "goto": { "Start": 1 } },
    { "actions": { "$": "accept" }, "goto": {} },
    { "actions": { "$": "R1", "b": "S9" }, "goto": {} }
  ]
}"#;
