//! Cell values.
//!
//! A slot starts as text and moves through typed stages as steps run
//! (encoding, flagging and type enforcement produce numbers).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    /// Explicit absence, e.g. a word the word table does not know.
    Missing,
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Missing => "missing",
        }
    }

    /// Multiply a numeric value by `factor`.
    ///
    /// Integer times integer stays integer; any float operand yields a float.
    /// Returns `None` for non-numeric values and on integer overflow.
    pub fn scaled(&self, factor: Factor) -> Option<Value> {
        match (self, factor) {
            (Value::Int(v), Factor::Int(k)) => v.checked_mul(k).map(Value::Int),
            (Value::Int(v), Factor::Float(k)) => Some(Value::Float(*v as f64 * k)),
            (Value::Float(v), Factor::Int(k)) => Some(Value::Float(v * k as f64)),
            (Value::Float(v), Factor::Float(k)) => Some(Value::Float(v * k)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            // keep a trailing ".0" so whole floats stay distinguishable from ints
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Numeric multiplier used by the scale step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Factor {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Int(k) => write!(f, "{k}"),
            Factor::Float(k) => write!(f, "{k}"),
        }
    }
}

impl From<i64> for Factor {
    fn from(value: i64) -> Self {
        Factor::Int(value)
    }
}

impl From<f64> for Factor {
    fn from(value: f64) -> Self {
        Factor::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_keeps_numeric_family() {
        assert_eq!(
            Value::Int(1000).scaled(Factor::Float(0.01)),
            Some(Value::Float(10.0))
        );
        assert_eq!(Value::Int(3).scaled(Factor::Int(2)), Some(Value::Int(6)));
        assert_eq!(Value::Float(1.5).scaled(Factor::Int(2)), Some(Value::Float(3.0)));
        assert_eq!(Value::text("12").scaled(Factor::Int(2)), None);
        assert_eq!(Value::Int(i64::MAX).scaled(Factor::Int(2)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(10.0).to_string(), "10.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Missing.to_string(), "");
    }
}
