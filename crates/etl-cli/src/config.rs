//! Job files: parse options, schema, word table and the step pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use etl_model::{ParseOptions, Schema};
use etl_transform::{Pipeline, Transformer, UnknownWordPolicy, WordTable};

/// Built-in automobile price job, used when no job file is given.
pub const BUILTIN_JOB: &str = include_str!("../jobs/automobile.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub unknown_words: UnknownWordPolicy,
    #[serde(default)]
    pub options: ParseOptions,
    pub schema: Schema,
    /// Extra number words on top of one..ten.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub words: BTreeMap<String, i64>,
    #[serde(default)]
    pub steps: Pipeline,
}

impl JobConfig {
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_JOB).context("parse built-in job")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read job file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parse job file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize job")
    }

    /// Apply command-line overrides to the parse options.
    #[must_use]
    pub fn with_overrides(mut self, delimiter: Option<char>, null_sentinel: Option<&str>) -> Self {
        if let Some(delimiter) = delimiter {
            self.options.field_delimiter = delimiter;
        }
        if let Some(sentinel) = null_sentinel {
            self.options.null_sentinel = sentinel.to_string();
        }
        self
    }

    pub fn word_table(&self) -> WordTable {
        WordTable::default().with_entries(
            self.words
                .iter()
                .map(|(word, n)| (word.as_str(), *n)),
        )
    }

    /// Unfitted transformer configured for this job.
    pub fn transformer(&self) -> Transformer {
        Transformer::new(self.schema.clone())
            .with_words(self.word_table())
            .with_unknown_words(self.unknown_words)
    }
}
