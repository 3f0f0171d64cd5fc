use std::sync::Arc;

use tracing::debug;

use etl_ingest::{resolve_header, split_header};
use etl_model::{EtlError, ParseOptions, Result, Schema};

use crate::line::Line;

/// Turn raw file lines into parsed [`Line`]s.
///
/// The first line is the header; its column positions are resolved against
/// `schema` once and shared by every row. Every data line is parsed, blank
/// ones included. A malformed row aborts with its 1-based line number.
pub fn linearize(lines: &[String], schema: &Schema, options: &ParseOptions) -> Result<Vec<Line>> {
    let raw = split_header(lines).ok_or(EtlError::MissingHeader)?;
    let indices: Arc<[usize]> = resolve_header(raw.header, schema, options)?.into();

    let parsed = raw
        .data
        .iter()
        .enumerate()
        .map(|(offset, data_line)| {
            // header is line 1
            Line::parse_with(data_line, Arc::clone(&indices), options)
                .map_err(|err| err.at_row(offset + 2))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(
        rows = parsed.len(),
        null_rows = parsed.iter().filter(|line| line.has_null()).count(),
        "linearized input"
    );
    Ok(parsed)
}
