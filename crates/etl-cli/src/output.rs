//! Dataset and encoding sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use etl_transform::{Dataset, LabelRegistry};

use crate::cli::OutputFormatArg;

/// Write the dataset to `path`, or to stdout when `path` is `None`.
pub fn write_dataset(
    dataset: &Dataset,
    format: OutputFormatArg,
    delimiter: char,
    path: Option<&Path>,
) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_to(&mut writer, dataset, format, delimiter)?;
            writer
                .flush()
                .with_context(|| format!("flush {}", path.display()))?;
            debug!(path = %path.display(), rows = dataset.row_count(), "wrote dataset");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_to(&mut writer, dataset, format, delimiter)?;
            writer.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn write_to<W: Write>(
    writer: W,
    dataset: &Dataset,
    format: OutputFormatArg,
    delimiter: char,
) -> Result<()> {
    match format {
        OutputFormatArg::Csv => write_csv(writer, dataset, delimiter),
        OutputFormatArg::Json => write_json(writer, dataset),
    }
}

/// Header row followed by one record per row; missing values are empty.
pub fn write_csv<W: Write>(writer: W, dataset: &Dataset, delimiter: char) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("delimiter {delimiter:?} is not a single-byte character");
    }
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(writer);
    csv.write_record(&dataset.headers)?;
    for row in &dataset.rows {
        csv.write_record(row.iter().map(ToString::to_string))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, dataset: &Dataset) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the label-to-code mapping as a JSON object in code order.
pub fn write_encodings(registry: &LabelRegistry, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("create encodings file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, registry)?;
    writeln!(writer)?;
    writer.flush()?;
    debug!(path = %path.display(), labels = registry.len(), "wrote encodings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use etl_model::Value;

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            headers: vec!["make".to_string(), "price".to_string()],
            rows: vec![
                vec![Value::text("bmw"), Value::Float(164.3)],
                vec![Value::text("audi"), Value::Missing],
            ],
        }
    }

    #[test]
    fn test_csv_uses_delimiter() {
        let mut out = Vec::new();
        write_csv(&mut out, &dataset(), ';').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "make;price\nbmw;164.3\naudi;\n"
        );
    }

    #[test]
    fn test_csv_rejects_multibyte_delimiter() {
        assert!(write_csv(Vec::new(), &dataset(), '§').is_err());
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        write_json(&mut out, &dataset()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["headers"][0], "make");
        assert_eq!(parsed["rows"][0][1], 164.3);
        assert!(parsed["rows"][1][1].is_null());
    }
}
