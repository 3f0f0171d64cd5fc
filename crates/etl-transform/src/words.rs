//! Number-word lookup used by the word-to-int step.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const NUMBER_WORDS: [(&str, i64); 10] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Exact, case-sensitive mapping from words to integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTable {
    words: HashMap<String, i64>,
}

impl Default for WordTable {
    fn default() -> Self {
        Self {
            words: NUMBER_WORDS
                .iter()
                .map(|(word, n)| ((*word).to_string(), *n))
                .collect(),
        }
    }
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override entries on top of the current table.
    #[must_use]
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        self.words
            .extend(entries.into_iter().map(|(word, n)| (word.into(), n)));
        self
    }

    pub fn lookup(&self, word: &str) -> Option<i64> {
        self.words.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// What the word-to-int step does with a value the table does not contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownWordPolicy {
    /// Replace the slot with [`etl_model::Value::Missing`] and log a warning.
    #[default]
    Missing,
    /// Fail the run with [`etl_model::EtlError::UnknownWord`].
    Reject,
}
