//! Line source: reads a file into raw text lines.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use etl_model::{EtlError, Result};

/// Read a text file into one entry per physical line.
///
/// Line terminators and trailing whitespace are stripped; no other parsing
/// happens here.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let io_error = |source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(io_error)?;
        lines.push(line.trim_end().to_string());
    }
    debug!(path = %path.display(), line_count = lines.len(), "read lines");
    Ok(lines)
}

/// Header line and data lines of a raw file.
#[derive(Debug, Clone, Copy)]
pub struct RawFile<'a> {
    pub header: &'a str,
    pub data: &'a [String],
}

/// Split raw lines into the header (first line) and data lines.
///
/// Returns `None` for an empty input.
pub fn split_header(lines: &[String]) -> Option<RawFile<'_>> {
    let (header, data) = lines.split_first()?;
    Some(RawFile { header, data })
}
