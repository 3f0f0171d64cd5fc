use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ColumnType;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input has no header line")]
    MissingHeader,

    /// A schema column is absent from the file header.
    #[error("schema column '{column}' not found in header")]
    SchemaMismatch { column: String },

    #[error("duplicate schema column '{column}'")]
    DuplicateColumn { column: String },

    /// A data row has fewer fields than the largest resolved column index.
    /// `row` is the 1-based line number in the source file, when known.
    #[error("malformed row{}: column index {index} out of range for {field_count} fields", row_suffix(.row))]
    MalformedRow {
        row: Option<usize>,
        index: usize,
        field_count: usize,
    },

    /// A row's value count differs from the schema width. `row` is the
    /// 1-based position in the fitted rows, when known.
    #[error("row{} has {found} values but the schema has {expected} columns", row_suffix(.row))]
    RowWidth {
        row: Option<usize>,
        expected: usize,
        found: usize,
    },

    #[error("{operation}: field '{field}' is not part of the schema")]
    UnknownField {
        field: String,
        operation: &'static str,
    },

    #[error("{operation} on field '{field}': {message}")]
    Precondition {
        field: String,
        operation: &'static str,
        message: String,
    },

    #[error("cannot cast '{value}' in field '{field}' to {target}")]
    TypeCast {
        field: String,
        value: String,
        target: ColumnType,
    },

    #[error("unknown number word '{word}' in field '{field}'")]
    UnknownWord { field: String, word: String },

    #[error("transformer has no rows; call fit before {operation}")]
    NotFitted { operation: &'static str },
}

impl EtlError {
    /// Attach a row number to [`EtlError::MalformedRow`] or
    /// [`EtlError::RowWidth`].
    #[must_use]
    pub fn at_row(self, row_number: usize) -> Self {
        match self {
            Self::MalformedRow {
                index, field_count, ..
            } => Self::MalformedRow {
                row: Some(row_number),
                index,
                field_count,
            },
            Self::RowWidth {
                expected, found, ..
            } => Self::RowWidth {
                row: Some(row_number),
                expected,
                found,
            },
            other => other,
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|n| format!(" {n}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EtlError>;
