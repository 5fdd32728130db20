//! Abstract syntax tree built by the engine.
//!
//! Leaves are shifted terminals; interior nodes are created by reductions and
//! carry the rule's left-hand side as their name, with one child per
//! right-hand-side symbol.

use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use std::fmt;

/// A node of the syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    /// Grammar symbol this node stands for.
    pub name: String,
    /// Children in left-to-right order. Empty for leaves and epsilon rules.
    #[serde(default)]
    pub children: Vec<AstNode>,
}

/// Layout footprint of a subtree, in node units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
}

impl AstNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, children: Vec<AstNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels, counting this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(AstNode::depth).max().unwrap_or(0)
    }

    /// Names of the leaves, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(self.name.as_str());
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Width is the sum of the children's widths (at least 1); height is one
    /// more than the tallest child.
    pub fn extent(&self) -> Extent {
        let (width, height) = self
            .children
            .iter()
            .map(AstNode::extent)
            .fold((0, 0), |(w, h), e| (w + e.width, h.max(e.height)));
        Extent {
            width: width.max(1),
            height: height + 1,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.name, indent = level * 2)?;
        for child in &self.children {
            child.write_indented(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
