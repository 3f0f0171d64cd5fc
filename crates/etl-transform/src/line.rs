//! Per-row parse state.
//!
//! A [`Line`] holds the schema-aligned values selected from one raw row and
//! the null flag computed right after parsing. Transformation steps mutate
//! `values` in place; the row is never re-parsed and the null flag is never
//! recomputed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use etl_model::{ColumnType, EtlError, Factor, ParseOptions, Result, Schema, Value};

use crate::registry::{EncoderKind, LabelRegistry};
use crate::words::{UnknownWordPolicy, WordTable};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    raw_line: String,
    column_indices: Arc<[usize]>,
    values: Vec<Value>,
    has_null: bool,
}

impl Line {
    /// Parse a raw row with the default delimiter and null sentinel.
    pub fn parse(raw_line: &str, column_indices: Arc<[usize]>) -> Result<Self> {
        Self::parse_with(raw_line, column_indices, &ParseOptions::default())
    }

    /// Select the fields at `column_indices`, trim them, and flag nulls.
    ///
    /// Fails with [`EtlError::MalformedRow`] when an index is past the end of
    /// the split row.
    pub fn parse_with(
        raw_line: &str,
        column_indices: Arc<[usize]>,
        options: &ParseOptions,
    ) -> Result<Self> {
        let fields: Vec<&str> = raw_line.split(options.field_delimiter).collect();
        let values = column_indices
            .iter()
            .map(|&index| {
                fields
                    .get(index)
                    .map(|field| Value::text(field.trim()))
                    .ok_or_else(|| EtlError::MalformedRow {
                        row: None,
                        index,
                        field_count: fields.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let has_null = values
            .iter()
            .any(|value| value.as_text() == Some(options.null_sentinel.as_str()));
        Ok(Self {
            raw_line: raw_line.to_string(),
            column_indices,
            values,
            has_null,
        })
    }

    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Whether any selected value equalled the null sentinel at parse time.
    pub fn has_null(&self) -> bool {
        self.has_null
    }

    /// Fails with [`EtlError::RowWidth`] unless there is one value per
    /// schema column.
    pub fn check_width(&self, schema: &Schema) -> Result<()> {
        if self.values.len() == schema.len() {
            Ok(())
        } else {
            Err(EtlError::RowWidth {
                row: None,
                expected: schema.len(),
                found: self.values.len(),
            })
        }
    }

    /// Replace each named text field with its registry code.
    pub fn encode(
        &mut self,
        fields: &[String],
        schema: &Schema,
        registry: &mut LabelRegistry,
        encoder: EncoderKind,
    ) -> Result<()> {
        self.check_width(schema)?;
        let positions = field_positions(fields, schema, "encode")?;
        for (field, idx) in fields.iter().zip(positions) {
            let Value::Text(label) = &self.values[idx] else {
                return Err(EtlError::Precondition {
                    field: field.clone(),
                    operation: "encode",
                    message: format!(
                        "cannot encode {} value '{}'",
                        self.values[idx].type_name(),
                        describe(&self.values[idx])
                    ),
                });
            };
            let code = encoder.encode(registry, label);
            self.values[idx] = Value::Int(code);
        }
        Ok(())
    }

    /// Replace each named field with its number from `words`.
    ///
    /// Returns how many slots were set to [`Value::Missing`] because the word
    /// was unknown (always zero under [`UnknownWordPolicy::Reject`]).
    pub fn word_to_int(
        &mut self,
        fields: &[String],
        schema: &Schema,
        words: &WordTable,
        policy: UnknownWordPolicy,
    ) -> Result<usize> {
        self.check_width(schema)?;
        let positions = field_positions(fields, schema, "word_to_int")?;
        let mut unknown = 0;
        for (field, idx) in fields.iter().zip(positions) {
            let number = self.values[idx].as_text().and_then(|w| words.lookup(w));
            let replacement = match (number, policy) {
                (Some(n), _) => Value::Int(n),
                (None, UnknownWordPolicy::Missing) => {
                    unknown += 1;
                    Value::Missing
                }
                (None, UnknownWordPolicy::Reject) => {
                    return Err(EtlError::UnknownWord {
                        field: field.clone(),
                        word: describe(&self.values[idx]),
                    });
                }
            };
            self.values[idx] = replacement;
        }
        Ok(unknown)
    }

    /// Set each named field to `1` when it equals the expected text, else `0`.
    pub fn flag(&mut self, matches: &BTreeMap<String, String>, schema: &Schema) -> Result<()> {
        self.check_width(schema)?;
        for (field, expected) in matches {
            let idx = field_position(field, schema, "flag")?;
            let hit = self.values[idx].as_text() == Some(expected.as_str());
            self.values[idx] = Value::Int(i64::from(hit));
        }
        Ok(())
    }

    /// Cast every slot to its declared column type.
    pub fn enforce_type(&mut self, schema: &Schema) -> Result<()> {
        self.check_width(schema)?;
        for (value, column) in self.values.iter_mut().zip(schema.iter()) {
            let cast = cast(value, column.column_type).ok_or_else(|| EtlError::TypeCast {
                field: column.name.clone(),
                value: describe(value),
                target: column.column_type,
            })?;
            *value = cast;
        }
        Ok(())
    }

    /// Multiply each named numeric field by its factor.
    pub fn scale(&mut self, factors: &BTreeMap<String, Factor>, schema: &Schema) -> Result<()> {
        self.check_width(schema)?;
        for (field, factor) in factors {
            let idx = field_position(field, schema, "scale")?;
            let declared = schema.columns()[idx].column_type;
            if !declared.is_numeric() {
                return Err(EtlError::Precondition {
                    field: field.clone(),
                    operation: "scale",
                    message: format!("declared type {declared} is not numeric"),
                });
            }
            let current = &self.values[idx];
            let scaled = current
                .scaled(*factor)
                .ok_or_else(|| EtlError::Precondition {
                    field: field.clone(),
                    operation: "scale",
                    message: format!(
                        "{} value '{}' cannot be scaled by {factor}",
                        current.type_name(),
                        describe(current)
                    ),
                })?;
            self.values[idx] = scaled;
        }
        Ok(())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::Text(s) => write!(f, "{s:?}")?,
                Value::Missing => f.write_str("null")?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("]")
    }
}

fn cast(value: &Value, target: ColumnType) -> Option<Value> {
    match (target, value) {
        (ColumnType::Text, v) => Some(v.clone()),
        (ColumnType::Integer, Value::Int(i)) => Some(Value::Int(*i)),
        (ColumnType::Integer, Value::Float(v)) if v.is_finite() => {
            Some(Value::Int(v.trunc() as i64))
        }
        (ColumnType::Integer, Value::Text(s)) => s.parse::<i64>().ok().map(Value::Int),
        (ColumnType::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (ColumnType::Float, Value::Float(v)) => Some(Value::Float(*v)),
        // decimal comma support: "12,5" -> 12.5
        (ColumnType::Float, Value::Text(s)) => {
            s.replace(',', ".").parse::<f64>().ok().map(Value::Float)
        }
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Missing => "<missing>".to_string(),
        other => other.to_string(),
    }
}

fn field_position(field: &str, schema: &Schema, operation: &'static str) -> Result<usize> {
    schema.position(field).ok_or_else(|| EtlError::UnknownField {
        field: field.to_string(),
        operation,
    })
}

fn field_positions(
    fields: &[String],
    schema: &Schema,
    operation: &'static str,
) -> Result<Vec<usize>> {
    fields
        .iter()
        .map(|field| field_position(field, schema, operation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(idx: &[usize]) -> Arc<[usize]> {
        Arc::from(idx)
    }

    fn schema() -> Schema {
        Schema::from_pairs([
            ("a", ColumnType::Integer),
            ("b", ColumnType::Text),
            ("c", ColumnType::Float),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_selects_and_trims() {
        let line = Line::parse(" 5 ; x ;ignored; 1,5", indices(&[0, 1, 3])).unwrap();
        assert_eq!(
            line.values(),
            &[Value::text("5"), Value::text("x"), Value::text("1,5")]
        );
        assert!(!line.has_null());
        assert_eq!(line.raw_line(), " 5 ; x ;ignored; 1,5");
    }

    #[test]
    fn test_parse_flags_null_after_trim() {
        let line = Line::parse("1; - ;3", indices(&[0, 1])).unwrap();
        assert!(line.has_null());
        // sentinel in an unselected column does not count
        let line = Line::parse("1;2;-", indices(&[0, 1])).unwrap();
        assert!(!line.has_null());
    }

    #[test]
    fn test_parse_with_custom_options() {
        let options = ParseOptions::default()
            .with_delimiter(',')
            .with_null_sentinel("NA");
        let line = Line::parse_with("1,NA", indices(&[0, 1]), &options).unwrap();
        assert!(line.has_null());
    }

    #[test]
    fn test_parse_short_row() {
        let err = Line::parse("1;2", indices(&[0, 3])).unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedRow { row: None, index: 3, field_count: 2 }
        ));
    }

    #[test]
    fn test_enforce_type() {
        let mut line = Line::parse("42;x;12,5", indices(&[0, 1, 2])).unwrap();
        line.enforce_type(&schema()).unwrap();
        assert_eq!(
            line.values(),
            &[Value::Int(42), Value::text("x"), Value::Float(12.5)]
        );
    }

    #[test]
    fn test_enforce_type_rejects_text_in_integer_column() {
        let mut line = Line::parse("4.2;x;1", indices(&[0, 1, 2])).unwrap();
        let err = line.enforce_type(&schema()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::TypeCast { field, target: ColumnType::Integer, .. } if field == "a"
        ));
    }

    #[test]
    fn test_scale_requires_numeric_value() {
        let mut line = Line::parse("1;x;2", indices(&[0, 1, 2])).unwrap();
        let factors = BTreeMap::from([("c".to_string(), Factor::Float(0.5))]);
        // still text: enforce_type has not run
        assert!(matches!(
            line.scale(&factors, &schema()),
            Err(EtlError::Precondition { .. })
        ));
        line.enforce_type(&schema()).unwrap();
        line.scale(&factors, &schema()).unwrap();
        assert_eq!(line.values()[2], Value::Float(1.0));
    }

    #[test]
    fn test_scale_rejects_text_column() {
        let mut line = Line::parse("1;x;2", indices(&[0, 1, 2])).unwrap();
        let factors = BTreeMap::from([("b".to_string(), Factor::Int(2))]);
        let err = line.scale(&factors, &schema()).unwrap_err();
        assert!(err.to_string().contains("declared type text is not numeric"));
    }

    #[test]
    fn test_ops_reject_rows_narrower_than_schema() {
        let mut line = Line::parse("x;y", indices(&[0, 1])).unwrap();
        let matches = BTreeMap::from([("c".to_string(), "x".to_string())]);
        let err = line.flag(&matches, &schema()).unwrap_err();
        assert!(matches!(
            err,
            EtlError::RowWidth { row: None, expected: 3, found: 2 }
        ));
        assert!(matches!(
            line.enforce_type(&schema()),
            Err(EtlError::RowWidth { .. })
        ));
        assert_eq!(line.values(), &[Value::text("x"), Value::text("y")]);
    }

    #[test]
    fn test_encode_accepts_text_only() {
        let mut registry = LabelRegistry::new();
        let fields = ["a".to_string()];
        let mut line = Line::parse("1;x;2", indices(&[0, 1, 2])).unwrap();
        line.enforce_type(&schema()).unwrap();
        let err = line
            .encode(&fields, &schema(), &mut registry, EncoderKind::Integer)
            .unwrap_err();
        assert!(err.to_string().contains("cannot encode integer value '1'"));
        assert!(registry.is_empty());

        let mut line = Line::parse("1;x;2", indices(&[0, 1, 2])).unwrap();
        line.encode(&fields, &schema(), &mut registry, EncoderKind::Integer)
            .unwrap();
        assert_eq!(line.values()[0], Value::Int(0));
        assert_eq!(registry.code("1"), Some(0));
    }

    #[test]
    fn test_display() {
        let mut line = Line::parse("1;x;2", indices(&[0, 1, 2])).unwrap();
        line.enforce_type(&schema()).unwrap();
        assert_eq!(line.to_string(), r#"[1, "x", 2.0]"#);
    }
}
