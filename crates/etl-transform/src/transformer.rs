//! Chainable transformation driver.
//!
//! A [`Transformer`] holds the rows it was fitted with and applies steps
//! one after another. Every step reads the previous step's complete output
//! (the `previous` collection) and produces a new `current` collection; the
//! input is left untouched, so both stages stay inspectable.
//!
//! ```ignore
//! let dataset = Transformer::new(schema)
//!     .fit(lines)?
//!     .drop_null()?
//!     .encode(&["engine-location"])?
//!     .enforce_type()?
//!     .collect()?;
//! ```
//!
//! The [`LabelRegistry`] used by encode steps is owned by the transformer, so
//! its code space lasts exactly as long as one run.

use serde::Serialize;
use tracing::{debug, warn};

use etl_model::{EtlError, Factor, Result, Schema};

use crate::dataset::Dataset;
use crate::line::Line;
use crate::registry::{EncoderKind, LabelRegistry};
use crate::step::Step;
use crate::words::{UnknownWordPolicy, WordTable};

/// Row counts around one applied step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub rows_in: usize,
    pub rows_out: usize,
}

impl StepReport {
    pub fn dropped(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }
}

#[derive(Debug, Clone)]
pub struct Transformer {
    schema: Schema,
    registry: LabelRegistry,
    words: WordTable,
    unknown_words: UnknownWordPolicy,
    previous: Option<Vec<Line>>,
    current: Option<Vec<Line>>,
    reports: Vec<StepReport>,
}

impl Transformer {
    /// Create an unfitted transformer with a fresh registry.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            registry: LabelRegistry::new(),
            words: WordTable::default(),
            unknown_words: UnknownWordPolicy::default(),
            previous: None,
            current: None,
            reports: Vec::new(),
        }
    }

    /// Use a caller-provided registry instead of a fresh one.
    #[must_use]
    pub fn with_registry(mut self, registry: LabelRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_words(mut self, words: WordTable) -> Self {
        self.words = words;
        self
    }

    #[must_use]
    pub fn with_unknown_words(mut self, policy: UnknownWordPolicy) -> Self {
        self.unknown_words = policy;
        self
    }

    /// Set the input rows, discarding any earlier output.
    ///
    /// Every row must hold exactly one value per schema column.
    pub fn fit(mut self, rows: Vec<Line>) -> Result<Self> {
        for (position, line) in rows.iter().enumerate() {
            line.check_width(&self.schema)
                .map_err(|err| err.at_row(position + 1))?;
        }
        debug!(rows = rows.len(), "fit transformer");
        self.previous = Some(rows);
        self.current = None;
        self.reports.clear();
        Ok(self)
    }

    pub fn is_fitted(&self) -> bool {
        self.previous.is_some()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> LabelRegistry {
        self.registry
    }

    /// Input of the most recent step (the fitted rows before any step ran).
    pub fn previous(&self) -> Option<&[Line]> {
        self.previous.as_deref()
    }

    /// Output of the most recent step.
    pub fn current(&self) -> Option<&[Line]> {
        self.current.as_deref()
    }

    /// Latest available rows: the current output, or the fitted rows.
    pub fn output(&self) -> Option<&[Line]> {
        self.current().or_else(|| self.previous())
    }

    /// One report per applied step, in order.
    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    pub fn drop_null(self) -> Result<Self> {
        self.apply(&Step::DropNull)
    }

    pub fn encode<S: AsRef<str>>(self, fields: &[S]) -> Result<Self> {
        self.apply(&Step::encode(fields.iter().map(AsRef::as_ref)))
    }

    pub fn encode_with<S: AsRef<str>>(self, fields: &[S], encoder: EncoderKind) -> Result<Self> {
        self.apply(&Step::Encode {
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            encoder,
        })
    }

    pub fn word_to_int<S: AsRef<str>>(self, fields: &[S]) -> Result<Self> {
        self.apply(&Step::word_to_int(fields.iter().map(AsRef::as_ref)))
    }

    pub fn flag<K, V>(self, matches: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.apply(&Step::flag(matches))
    }

    pub fn enforce_type(self) -> Result<Self> {
        self.apply(&Step::EnforceType)
    }

    pub fn scale<K, F>(self, factors: impl IntoIterator<Item = (K, F)>) -> Result<Self>
    where
        K: Into<String>,
        F: Into<Factor>,
    {
        self.apply(&Step::scale(factors))
    }

    /// Run one step over the latest rows.
    ///
    /// The previous step's output becomes this step's input; the result
    /// becomes the new current output.
    pub fn apply(mut self, step: &Step) -> Result<Self> {
        if let Some(output) = self.current.take() {
            self.previous = Some(output);
        }
        let input = self.previous.as_deref().ok_or(EtlError::NotFitted {
            operation: step.name(),
        })?;
        let rows_in = input.len();

        let output: Vec<Line> = match step {
            Step::DropNull => input
                .iter()
                .filter(|line| !line.has_null())
                .cloned()
                .collect(),
            Step::Encode { fields, encoder } => {
                let mut rows = input.to_vec();
                for line in &mut rows {
                    line.encode(fields, &self.schema, &mut self.registry, *encoder)?;
                }
                rows
            }
            Step::WordToInt { fields } => {
                let mut rows = input.to_vec();
                let mut unknown = 0;
                for line in &mut rows {
                    unknown +=
                        line.word_to_int(fields, &self.schema, &self.words, self.unknown_words)?;
                }
                if unknown > 0 {
                    warn!(
                        fields = ?fields,
                        unknown,
                        "unknown number words replaced with missing values"
                    );
                }
                rows
            }
            Step::Flag { matches } => map_rows(input, |line| line.flag(matches, &self.schema))?,
            Step::EnforceType => map_rows(input, |line| line.enforce_type(&self.schema))?,
            Step::Scale { factors } => map_rows(input, |line| line.scale(factors, &self.schema))?,
        };

        let report = StepReport {
            step: step.to_string(),
            rows_in,
            rows_out: output.len(),
        };
        debug!(
            step = %report.step,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "applied step"
        );
        self.reports.push(report);
        self.current = Some(output);
        Ok(self)
    }

    /// Snapshot of the latest rows as a header plus value rows.
    pub fn collect(&self) -> Result<Dataset> {
        let rows = self.output().ok_or(EtlError::NotFitted {
            operation: "collect",
        })?;
        Ok(Dataset {
            headers: self.schema.names().into_iter().map(str::to_string).collect(),
            rows: rows.iter().map(|line| line.values().to_vec()).collect(),
        })
    }

    /// Independent deep copy of the transformer, registry included.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

fn map_rows<F>(input: &[Line], mut op: F) -> Result<Vec<Line>>
where
    F: FnMut(&mut Line) -> Result<()>,
{
    let mut rows = input.to_vec();
    for line in &mut rows {
        op(line)?;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use etl_model::{ColumnType, Value};

    use super::*;

    fn rows(lines: &[&str]) -> Vec<Line> {
        let indices: Arc<[usize]> = Arc::from(&[0usize, 1][..]);
        lines
            .iter()
            .map(|raw| Line::parse(raw, Arc::clone(&indices)).unwrap())
            .collect()
    }

    fn schema() -> Schema {
        Schema::from_pairs([("make", ColumnType::Text), ("price", ColumnType::Float)]).unwrap()
    }

    #[test]
    fn test_steps_before_fit_fail() {
        let err = Transformer::new(schema()).drop_null().unwrap_err();
        assert!(matches!(err, EtlError::NotFitted { operation: "drop_null" }));
        assert!(Transformer::new(schema()).collect().is_err());
    }

    #[test]
    fn test_previous_holds_input_of_last_step() {
        let transformer = Transformer::new(schema())
            .fit(rows(&["bmw;10", "-;20", "audi;30"]))
            .unwrap()
            .drop_null()
            .unwrap();
        assert_eq!(transformer.previous().unwrap().len(), 3);
        assert_eq!(transformer.current().unwrap().len(), 2);

        let transformer = transformer.encode(&["make"]).unwrap();
        assert_eq!(transformer.previous().unwrap().len(), 2);
        // input rows are not mutated by the next step
        assert_eq!(
            transformer.previous().unwrap()[0].values()[0],
            Value::text("bmw")
        );
        assert_eq!(transformer.current().unwrap()[0].values()[0], Value::Int(0));
    }

    #[test]
    fn test_refit_resets_output() {
        let transformer = Transformer::new(schema())
            .fit(rows(&["bmw;10"]))
            .unwrap()
            .enforce_type()
            .unwrap()
            .fit(rows(&["audi;1", "vw;2"]))
            .unwrap();
        assert!(transformer.current().is_none());
        assert!(transformer.reports().is_empty());
        assert_eq!(transformer.collect().unwrap().row_count(), 2);
    }

    #[test]
    fn test_fit_rejects_rows_of_wrong_width() {
        let schema = Schema::from_pairs([
            ("make", ColumnType::Text),
            ("price", ColumnType::Float),
            ("weight", ColumnType::Integer),
        ])
        .unwrap();
        let err = Transformer::new(schema)
            .fit(rows(&["bmw;10;1500"]))
            .unwrap_err();
        assert!(matches!(
            err,
            EtlError::RowWidth { row: Some(1), expected: 3, found: 2 }
        ));
        assert_eq!(
            err.to_string(),
            "row 1 has 2 values but the schema has 3 columns"
        );
    }

    #[test]
    fn test_reports_track_row_counts() {
        let transformer = Transformer::new(schema())
            .fit(rows(&["bmw;10", "-;20"]))
            .unwrap()
            .drop_null()
            .unwrap()
            .enforce_type()
            .unwrap();
        let reports = transformer.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].step, "drop_null");
        assert_eq!(reports[0].dropped(), 1);
        assert_eq!(reports[1].rows_in, 1);
        assert_eq!(reports[1].rows_out, 1);
    }
}
