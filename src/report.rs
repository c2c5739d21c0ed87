//! Tab-separated ranked report
//!
//! One header row followed by one row per factor in ranking order. The whole
//! report is rendered in memory before anything touches the filesystem, so a
//! failed run never leaves a partial file behind.
//!
//! `--format json` adds the full statistics table next to it. Neither writer
//! replaces an existing file.

use crate::error::RankError;
use crate::ranking::{FactorStatistics, RankingTable};
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Report columns, in output order
pub const REPORT_HEADER: [&str; 7] = [
    "TF",
    "statistic",
    "pvalue",
    "zscore",
    "max_auc",
    "re_rank",
    "irwin_hall_pvalue",
];

/// Format `value` in scientific notation with `precision` mantissa decimals
/// and a signed, at least two-digit exponent (`9.121e-02`)
pub fn format_scientific(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    let formatted = format!("{:.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => formatted,
    }
}

/// Format one factor row (no trailing newline)
pub fn format_row(row: &FactorStatistics) -> String {
    format!(
        "{}\t{:.3}\t{}\t{:.3}\t{:.3}\t{:.3}\t{}",
        row.factor,
        row.score,
        format_scientific(row.pvalue, 3),
        row.zscore,
        row.max_auc,
        row.rank_avg_z_p_a,
        format_scientific(row.rank_avg_z_p_a_pvalue, 3)
    )
}

/// Render the full report as a string
pub fn render(table: &RankingTable) -> String {
    let mut output = String::new();

    output.push_str(&REPORT_HEADER.join("\t"));
    output.push('\n');

    for row in table.rows() {
        output.push_str(&format_row(row));
        output.push('\n');
    }

    output
}

/// Open `path` for writing, refusing to replace an existing file
pub fn create_output(path: &Path) -> Result<File> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(RankError::OutputCollision {
                path: path.to_path_buf(),
            }
            .into())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to create {}", path.display())),
    }
}

/// Write the report to `path`, refusing to replace an existing file
pub fn write_report(table: &RankingTable, path: &Path) -> Result<()> {
    let rendered = render(table);

    let mut file = create_output(path)?;
    file.write_all(rendered.as_bytes())
        .with_context(|| format!("Failed to write report {}", path.display()))?;

    tracing::debug!("Wrote {} report rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the full statistics table as JSON, refusing to replace an existing file
pub fn write_statistics_json(table: &RankingTable, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(table).context("Failed to serialize statistics table")?;

    let mut file = create_output(path)?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!("Wrote statistics table to {}", path.display());
    Ok(())
}
