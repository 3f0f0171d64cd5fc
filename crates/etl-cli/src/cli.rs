//! CLI argument definitions for `semietl`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "semietl",
    version,
    about = "Semicolon ETL - Select, clean and encode delimited tabular data",
    long_about = "Select schema columns from a delimited text file, run an ordered \
                  pipeline of cleaning and encoding steps, and write the result.\n\n\
                  Without --job the built-in automobile job is used."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include raw row values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transform an input file and write the collected rows.
    Run(RunArgs),

    /// Print the built-in job as TOML.
    Job,
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Delimited input file; the first line is the header.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Job file describing schema, options and steps.
    #[arg(long = "job", value_name = "FILE")]
    pub job: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: OutputFormatArg,

    /// Write the label encodings as JSON to this file.
    #[arg(long = "encodings", value_name = "FILE")]
    pub encodings: Option<PathBuf>,

    /// Field delimiter (overrides the job).
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Null sentinel (overrides the job).
    #[arg(long = "null-sentinel", value_name = "TEXT")]
    pub null_sentinel: Option<String>,

    /// Transform and report without writing any output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            job: None,
            output: None,
            format: OutputFormatArg::Csv,
            encodings: None,
            delimiter: None,
            null_sentinel: None,
            dry_run: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "semietl",
            "-v",
            "run",
            "cars.csv",
            "--format",
            "json",
            "--delimiter",
            ",",
            "--null-sentinel",
            "NA",
            "--log-data",
            "--log-timestamps",
        ])
        .unwrap();
        assert!(cli.log_data);
        assert!(cli.log_timestamps);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.input, PathBuf::from("cars.csv"));
        assert_eq!(args.format, OutputFormatArg::Json);
        assert_eq!(args.delimiter, Some(','));
        assert_eq!(args.null_sentinel.as_deref(), Some("NA"));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_delimiter_must_be_one_character() {
        assert!(Cli::try_parse_from(["semietl", "run", "in.csv", "--delimiter", ";;"]).is_err());
    }
}
