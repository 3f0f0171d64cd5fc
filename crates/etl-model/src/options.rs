//! Options controlling how raw lines are split and null-checked.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_DELIMITER: char = ';';
pub const DEFAULT_NULL_SENTINEL: &str = "-";

/// Row parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Separator between fields, for the header and for data rows.
    pub field_delimiter: char,

    /// Trimmed cell value that marks a missing entry.
    pub null_sentinel: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            null_sentinel: DEFAULT_NULL_SENTINEL.to_string(),
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.null_sentinel = sentinel.into();
        self
    }
}
