//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cosreg",
    version,
    about = "Normalize and integrate cosmetics ingredient regulations",
    long_about = "Parse per-jurisdiction regulatory tables (EU, ASEAN, JP, CA, CN) into \
                  canonical records,\nresolve them into one ingredient-centric master view \
                  and report data-quality issues."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory of per-jurisdiction mapping files (default: $COSREG_MAPPINGS_DIR or ./mappings).
    #[arg(long = "mappings", value_name = "DIR", global = true)]
    pub mappings: Option<PathBuf>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse all sources, integrate, validate and write artifacts.
    Run(RunArgs),

    /// Validate a previously written master view.
    Validate(ValidateArgs),

    /// Compare two master views.
    Diff(DiffArgs),

    /// List supported jurisdictions and their configured tables.
    Jurisdictions,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory laid out as <JUR>/<table>.json|csv.
    #[arg(value_name = "SOURCES_DIR")]
    pub sources: PathBuf,

    /// Output directory (default: <SOURCES_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Snapshot version label for versioned table files.
    #[arg(long = "snapshot-version", value_name = "LABEL")]
    pub snapshot_version: Option<String>,

    /// Abort when any source cannot be read instead of excluding its
    /// jurisdiction.
    #[arg(long = "strict-sources")]
    pub strict_sources: bool,

    /// Parser worker threads (default: available parallelism).
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Parse, integrate and validate without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to master_view.json.
    #[arg(value_name = "MASTER_VIEW")]
    pub master_view: PathBuf,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    #[arg(value_name = "OLD")]
    pub old: PathBuf,

    #[arg(value_name = "NEW")]
    pub new: PathBuf,

    /// Print the diff as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
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
