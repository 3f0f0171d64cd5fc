//! Categorical label encoding.
//!
//! A [`LabelRegistry`] assigns integer codes to raw values in first-seen
//! order. One registry lives for one pipeline run and is shared by every
//! field and every encode step of that run, so all encoded columns share a
//! single code space.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Run-scoped value-to-code table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRegistry {
    codes: HashMap<String, i64>,
    labels: Vec<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the code for `value`, assigning the next free code on first sight.
    pub fn encode(&mut self, value: &str) -> i64 {
        if let Some(&code) = self.codes.get(value) {
            return code;
        }
        let code = self.next_code();
        self.codes.insert(value.to_string(), code);
        self.labels.push(value.to_string());
        code
    }

    pub fn code(&self, value: &str) -> Option<i64> {
        self.codes.get(value).copied()
    }

    /// Recover the original label for a code.
    pub fn decode(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.labels.get(idx))
            .map(String::as_str)
    }

    /// Code the next unseen value will receive.
    pub fn next_code(&self) -> i64 {
        self.labels.len() as i64
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels with their codes, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(code, label)| (label.as_str(), code as i64))
    }
}

// Serialized as a `{label: code}` map in code order.
impl Serialize for LabelRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (label, code) in self.iter() {
            map.serialize_entry(label, &code)?;
        }
        map.end()
    }
}

/// Encoding strategy for the encode step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    /// Sequential integer codes from the run's registry.
    #[default]
    Integer,
}

impl EncoderKind {
    pub fn encode(self, registry: &mut LabelRegistry, value: &str) -> i64 {
        match self {
            EncoderKind::Integer => registry.encode(value),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EncoderKind::Integer => "integer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_first_seen_order() {
        let mut registry = LabelRegistry::new();
        let codes: Vec<i64> = ["front", "rear", "front", "mid", "rear"]
            .iter()
            .map(|v| registry.encode(v))
            .collect();
        assert_eq!(codes, vec![0, 1, 0, 2, 1]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.next_code(), 3);
        assert_eq!(registry.decode(2), Some("mid"));
        assert_eq!(registry.decode(-1), None);
        assert_eq!(registry.code("rear"), Some(1));
    }

    #[test]
    fn test_serializes_in_code_order() {
        let mut registry = LabelRegistry::new();
        registry.encode("zeta");
        registry.encode("alpha");
        let json = serde_json::to_string(&registry).unwrap();
        assert_eq!(json, r#"{"zeta":0,"alpha":1}"#);
    }
}
