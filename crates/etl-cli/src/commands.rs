use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use etl_ingest::read_lines;
use etl_transform::{Dataset, LabelRegistry, StepReport, linearize};

use crate::cli::RunArgs;
use crate::config::JobConfig;
use crate::logging::redact_value;
use crate::output::{write_dataset, write_encodings};

/// Everything the summary needs to know about one run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub encodings: Option<PathBuf>,
    pub dry_run: bool,
    pub rows_read: usize,
    pub reports: Vec<StepReport>,
    pub dataset: Dataset,
    pub registry: LabelRegistry,
}

pub fn run_job() -> Result<()> {
    let job = JobConfig::builtin()?;
    print!("{}", job.to_toml()?);
    Ok(())
}

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let run_span = info_span!("run", input = %args.input.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let job = match &args.job {
        Some(path) => JobConfig::load(path)?,
        None => JobConfig::builtin()?,
    }
    .with_overrides(args.delimiter, args.null_sentinel.as_deref());

    // =========================================================================
    // Stage 1: Load and linearize
    // =========================================================================
    let lines = read_lines(&args.input)?;
    for (offset, line) in lines.iter().enumerate() {
        trace!(line_number = offset + 1, line = redact_value(line), "raw line");
    }
    let rows = linearize(&lines, &job.schema, &job.options)
        .with_context(|| format!("parse {}", args.input.display()))?;
    let rows_read = rows.len();
    info!(rows = rows_read, columns = job.schema.len(), "loaded input");

    // =========================================================================
    // Stage 2: Transform
    // =========================================================================
    let mut transformer = job.transformer().fit(rows)?;
    for step in job.steps.steps() {
        let step_span = info_span!("step", op = step.name());
        let _step_guard = step_span.enter();
        transformer = transformer
            .apply(step)
            .with_context(|| format!("apply step {step}"))?;
    }
    let dataset = transformer.collect()?;
    let reports = transformer.reports().to_vec();

    // =========================================================================
    // Stage 3: Output
    // =========================================================================
    if args.dry_run {
        info!("dry run, skipping output");
    } else {
        write_dataset(
            &dataset,
            args.format,
            job.options.field_delimiter,
            args.output.as_deref(),
        )?;
        if let Some(path) = &args.encodings {
            write_encodings(transformer.registry(), path)?;
        }
    }
    info!(
        rows_read,
        rows_written = dataset.row_count(),
        labels = transformer.registry().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );

    Ok(RunResult {
        input: args.input.clone(),
        output: args.output.clone(),
        encodings: args.encodings.clone(),
        dry_run: args.dry_run,
        rows_read,
        reports,
        dataset,
        registry: transformer.into_registry(),
    })
}
