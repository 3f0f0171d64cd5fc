//! Declarative transformation steps.
//!
//! A [`Step`] names one operation and carries its parameters. A [`Pipeline`]
//! is an ordered list of steps that is folded over a fitted
//! [`Transformer`](crate::Transformer): each step consumes the full output
//! of the one before it.
//!
//! Steps deserialize from job files, tagged by `op`:
//!
//! ```toml
//! [[steps]]
//! op = "encode"
//! fields = ["engine-location"]
//!
//! [[steps]]
//! op = "scale"
//! factors = { price = 0.01 }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use etl_model::{Factor, Result};

use crate::registry::EncoderKind;
use crate::transformer::Transformer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Keep only rows without a null sentinel.
    DropNull,

    /// Replace categorical values with registry codes.
    Encode {
        fields: Vec<String>,
        #[serde(default)]
        encoder: EncoderKind,
    },

    /// Replace number words ("four") with integers.
    WordToInt { fields: Vec<String> },

    /// Replace values with 1 when equal to the expected text, 0 otherwise.
    Flag { matches: BTreeMap<String, String> },

    /// Cast every column to its declared schema type.
    EnforceType,

    /// Multiply numeric columns by a factor.
    Scale { factors: BTreeMap<String, Factor> },
}

impl Step {
    pub fn encode<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::Encode {
            fields: fields.into_iter().map(Into::into).collect(),
            encoder: EncoderKind::default(),
        }
    }

    pub fn word_to_int<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::WordToInt {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn flag<I, K, V>(matches: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Step::Flag {
            matches: matches
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }

    pub fn scale<I, K, F>(factors: I) -> Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<Factor>,
    {
        Step::Scale {
            factors: factors
                .into_iter()
                .map(|(field, factor)| (field.into(), factor.into()))
                .collect(),
        }
    }

    /// Operation name, as written in job files.
    pub fn name(&self) -> &'static str {
        match self {
            Step::DropNull => "drop_null",
            Step::Encode { .. } => "encode",
            Step::WordToInt { .. } => "word_to_int",
            Step::Flag { .. } => "flag",
            Step::EnforceType => "enforce_type",
            Step::Scale { .. } => "scale",
        }
    }

    /// Whether the step can change the number of rows.
    pub fn filters_rows(&self) -> bool {
        matches!(self, Step::DropNull)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::DropNull | Step::EnforceType => f.write_str(self.name()),
            Step::Encode { fields, encoder } => {
                write!(f, "encode[{}] ({})", fields.join(", "), encoder.as_str())
            }
            Step::WordToInt { fields } => write!(f, "word_to_int[{}]", fields.join(", ")),
            Step::Flag { matches } => {
                let pairs: Vec<String> =
                    matches.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "flag[{}]", pairs.join(", "))
            }
            Step::Scale { factors } => {
                let pairs: Vec<String> =
                    factors.iter().map(|(k, v)| format!("{k}*{v}")).collect();
                write!(f, "scale[{}]", pairs.join(", "))
            }
        }
    }
}

/// Ordered chain of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order, stopping at the first error.
    pub fn run(&self, transformer: Transformer) -> Result<Transformer> {
        self.steps
            .iter()
            .try_fold(transformer, |transformer, step| transformer.apply(step))
    }
}

impl From<Vec<Step>> for Pipeline {
    fn from(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}
