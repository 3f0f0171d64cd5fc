//! Header resolution: maps the file's column order onto the target schema.

use tracing::debug;

use etl_model::{EtlError, ParseOptions, Result, Schema};

/// Name given to header fields that are empty after trimming.
pub const UNNAMED_COLUMN: &str = "unnamed";

/// Split a header line into trimmed column names.
pub fn parse_headers(header_row: &str, delimiter: char) -> Vec<String> {
    header_row
        .split(delimiter)
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                UNNAMED_COLUMN.to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

/// Find the header position of every schema column, in schema order.
///
/// Matching is exact (case and inner whitespace significant). When a name
/// appears more than once in the header the first occurrence wins.
pub fn resolve_indices(header_fields: &[String], schema: &Schema) -> Result<Vec<usize>> {
    schema
        .iter()
        .map(|column| {
            header_fields
                .iter()
                .position(|field| *field == column.name)
                .ok_or_else(|| EtlError::SchemaMismatch {
                    column: column.name.clone(),
                })
        })
        .collect()
}

/// Parse a raw header line and resolve the schema's column indices.
pub fn resolve_header(header_row: &str, schema: &Schema, options: &ParseOptions) -> Result<Vec<usize>> {
    let fields = parse_headers(header_row, options.field_delimiter);
    let indices = resolve_indices(&fields, schema)?;
    debug!(
        header_columns = fields.len(),
        schema_columns = schema.len(),
        ?indices,
        "resolved header"
    );
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use etl_model::ColumnType;

    #[test]
    fn test_parse_headers_trims_and_names_empty_fields() {
        let fields = parse_headers(" make ; ;price;", ';');
        assert_eq!(fields, vec!["make", "unnamed", "price", "unnamed"]);
    }

    #[test]
    fn test_resolve_indices_follows_schema_order() {
        let fields = parse_headers("a;b;c", ';');
        let schema =
            Schema::from_pairs([("c", ColumnType::Text), ("a", ColumnType::Integer)]).unwrap();
        assert_eq!(resolve_indices(&fields, &schema).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_resolve_indices_missing_column() {
        let fields = parse_headers("a;b", ';');
        let schema =
            Schema::from_pairs([("a", ColumnType::Integer), ("B", ColumnType::Text)]).unwrap();
        let err = resolve_indices(&fields, &schema).unwrap_err();
        assert!(matches!(err, EtlError::SchemaMismatch { column } if column == "B"));
    }
}
