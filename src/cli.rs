//! CLI argument parsing for regrank

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the ranked table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated report (default)
    Tsv,
    /// Tab-separated report plus the full statistics table as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "regrank")]
#[command(version)]
#[command(
    about = "Rank transcription factors by AUC deviation from background",
    long_about = None
)]
pub struct Cli {
    /// Tab-separated sample scores: sample_key<TAB>auc
    #[arg(short = 'a', long = "aucs", value_name = "FILE")]
    pub aucs: PathBuf,

    /// Tab-separated normalization baselines with 'mean' and 'std' columns
    #[arg(short = 'n', long = "normfile", value_name = "FILE")]
    pub normfile: PathBuf,

    /// Factor ids (one per line) to emit plot data for
    #[arg(short = 't', long = "target", value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Directory for the report and plot data
    #[arg(short = 'o', long = "outdir", value_name = "DIR", default_value = ".")]
    pub outdir: PathBuf,

    /// File name prefix for outputs
    #[arg(short = 'p', long = "prefix", value_name = "NAME", default_value = "regrank")]
    pub prefix: String,

    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Separator between factor id and sample id in sample keys
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Print the report to stdout instead of writing it to the output directory
    #[arg(long = "stdout")]
    pub stdout: bool,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
