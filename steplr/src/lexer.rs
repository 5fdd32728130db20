//! A toy tokenizer driven by a table's terminal vocabulary.
//!
//! Input is split on whitespace-free runs of known terminals: at each
//! position the longest terminal that matches is taken. Anything that matches
//! no terminal is fatal.

use crate::error::TokenizeError;
use crate::table::{END_MARKER, ParserTable};
use regex::Regex;
use smartstring::alias::String;

/// Splits raw text into terminals of a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    re: Regex,
}

impl Tokenizer {
    /// Builds a tokenizer recognizing `terminals` plus the end-marker.
    pub fn new<I, S>(terminals: I) -> Result<Self, TokenizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<std::string::String> = terminals
            .into_iter()
            .map(|t| t.as_ref().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        words.push(END_MARKER.to_owned());
        // longest first, so the leftmost-first alternation prefers it
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&format!(r"\A(?:{})", alternation))
            .map_err(|e| TokenizeError::Vocabulary(e.to_string()))?;
        Ok(Self { re })
    }

    /// Builds a tokenizer for the terminals of `table`.
    pub fn for_table(table: &ParserTable) -> Result<Self, TokenizeError> {
        Self::new(&table.terminals)
    }

    /// Splits `text` into terminals.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            let trimmed = rest.trim_start();
            if trimmed.is_empty() {
                break;
            }
            pos += rest.len() - trimmed.len();
            match self.re.find(trimmed) {
                Some(m) => {
                    tokens.push(String::from(m.as_str()));
                    pos += m.end();
                }
                None => {
                    let fragment = trimmed.split_whitespace().next().unwrap_or(trimmed);
                    return Err(TokenizeError::Unrecognized {
                        fragment: fragment.into(),
                        offset: pos,
                    });
                }
            }
        }
        log::debug!("tokenized {} terminals", tokens.len());
        Ok(tokens)
    }
}
