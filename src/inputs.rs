//! Loaders for the tab-separated inputs
//!
//! - AUC table: `sample_key<TAB>auc`, no header, `#` comment lines allowed
//! - Baseline table: header row, factor id in the first column, `mean` and
//!   `std` columns found by name
//! - Target list: one factor id per line

use crate::error::RankError;
use crate::ranking::{Baseline, BaselineTable, SampleScore};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

fn tsv_reader<R: Read>(reader: R, has_headers: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn invalid(source_name: &str, line: u64, message: impl Into<String>) -> RankError {
    RankError::InvalidInput {
        source_name: source_name.to_string(),
        line: line as usize,
        message: message.into(),
    }
}

fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_finite(source_name: &str, line: u64, field: &str, column: &str) -> Result<f64, RankError> {
    let value: f64 = field
        .parse()
        .map_err(|_| invalid(source_name, line, format!("{} '{}' is not a number", column, field)))?;
    if !value.is_finite() {
        return Err(invalid(source_name, line, format!("{} '{}' is not finite", column, field)));
    }
    Ok(value)
}

/// Parse sample scores from a reader
pub fn parse_auc_table<R: Read>(reader: R, source_name: &str) -> Result<Vec<SampleScore>, RankError> {
    let mut samples = Vec::new();

    for record in tsv_reader(reader, false).records() {
        let record = record.map_err(|e| invalid(source_name, 0, e.to_string()))?;
        let line = record_line(&record);

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 2 {
            return Err(invalid(source_name, line, "expected 'sample_key<TAB>auc'"));
        }

        let key = &record[0];
        if key.is_empty() {
            return Err(invalid(source_name, line, "empty sample key"));
        }
        let auc = parse_finite(source_name, line, &record[1], "auc")?;
        samples.push(SampleScore::new(key, auc));
    }

    Ok(samples)
}

/// Parse normalization baselines from a reader
pub fn parse_baseline_table<R: Read>(reader: R, source_name: &str) -> Result<BaselineTable, RankError> {
    let mut rdr = tsv_reader(reader, true);

    let headers = rdr
        .headers()
        .map_err(|e| invalid(source_name, 1, e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| invalid(source_name, 1, format!("missing '{}' column", name)))
    };
    let mean_col = column("mean")?;
    let std_col = column("std")?;

    let mut table = BaselineTable::new();
    for record in rdr.records() {
        let record = record.map_err(|e| invalid(source_name, 0, e.to_string()))?;
        let line = record_line(&record);

        if record.iter().all(str::is_empty) {
            continue;
        }
        let (Some(factor), Some(mean), Some(std)) =
            (record.get(0), record.get(mean_col), record.get(std_col))
        else {
            return Err(invalid(source_name, line, "row is missing columns"));
        };

        let mean = parse_finite(source_name, line, mean, "mean")?;
        let std = parse_finite(source_name, line, std, "std")?;
        table.insert(factor, Baseline { mean, std });
    }

    Ok(table)
}

/// Parse a target list: trimmed non-empty lines
pub fn parse_target_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_auc_table(path: &Path) -> Result<Vec<SampleScore>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open AUC table {}", path.display()))?;
    let samples = parse_auc_table(file, &path.display().to_string())?;
    tracing::info!("Loaded {} sample scores from {}", samples.len(), path.display());
    Ok(samples)
}

pub fn load_baseline_table(path: &Path) -> Result<BaselineTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open normalization file {}", path.display()))?;
    let table = parse_baseline_table(file, &path.display().to_string())?;
    tracing::info!("Loaded {} baselines from {}", table.len(), path.display());
    Ok(table)
}

pub fn load_target_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read target list {}", path.display()))?;
    Ok(parse_target_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auc_table() {
        let text = "# sample\tauc\nSTAT3_GSM1\t0.81\nSTAT3_GSM2\t0.77\n\nMYC_GSM9\t0.42\n";
        let samples = parse_auc_table(text.as_bytes(), "aucs.txt").unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], SampleScore::new("STAT3_GSM1", 0.81));
        assert_eq!(samples[2].factor('_'), "MYC");
    }

    #[test]
    fn test_parse_auc_table_rejects_bad_number() {
        let text = "A_1\t0.5\nA_2\tabc\n";
        match parse_auc_table(text.as_bytes(), "aucs.txt").unwrap_err() {
            RankError::InvalidInput { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_auc_table_rejects_non_finite() {
        assert!(parse_auc_table("A_1\tNaN\n".as_bytes(), "aucs.txt").is_err());
        assert!(parse_auc_table("A_1\tinf\n".as_bytes(), "aucs.txt").is_err());
    }

    #[test]
    fn test_parse_auc_table_rejects_single_column() {
        assert!(parse_auc_table("A_1\n".as_bytes(), "aucs.txt").is_err());
    }

    #[test]
    fn test_parse_baseline_table_by_column_name() {
        let text = "tf\tstd\tmean\textra\nA\t2.0\t0.5\tx\nB\t1.0\t-0.25\ty\n";
        let table = parse_baseline_table(text.as_bytes(), "norm.txt").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A"), Some(&Baseline { mean: 0.5, std: 2.0 }));
        assert_eq!(table.get("B"), Some(&Baseline { mean: -0.25, std: 1.0 }));
    }

    #[test]
    fn test_parse_baseline_table_missing_column() {
        let text = "tf\tmean\nA\t0.5\n";
        match parse_baseline_table(text.as_bytes(), "norm.txt").unwrap_err() {
            RankError::InvalidInput { message, .. } => assert!(message.contains("std")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_target_list() {
        let targets = parse_target_list("STAT3\n  MYC \n\nAR\n");
        assert_eq!(targets, vec!["STAT3", "MYC", "AR"]);
    }
}
