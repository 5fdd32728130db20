use indexmap::IndexSet;
use smartstring::alias::String;

/// Insertion-ordered vocabulary assigning each name a stable index.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Symtab {
    names: IndexSet<String>,
}

impl Symtab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `sym` and returns its index; existing names keep theirs.
    pub fn add(&mut self, sym: &str) -> usize {
        match self.names.get_index_of(sym) {
            Some(idx) => idx,
            None => self.names.insert_full(String::from(sym)).0,
        }
    }

    pub fn idx(&self, sym: &str) -> Option<usize> {
        self.names.get_index_of(sym)
    }

    pub fn sym(&self, idx: usize) -> Option<&str> {
        self.names.get_index(idx).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}
