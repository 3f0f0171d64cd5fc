//! Collected output of a transformer run.

use serde::Serialize;

use etl_model::Value;

/// Rectangular result: schema column names plus one value row per line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flatten into rows with the header as the first row.
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.headers.into_iter().map(Value::Text).collect());
        out.extend(self.rows);
        out
    }
}
