//! Plot data for requested target factors
//!
//! For each target the ranked table and the raw score groups are reduced to
//! two series a plotting tool can draw directly:
//! - ranked dots: `-log10` Irwin-Hall p-value at each report position
//! - cumulative fractions of target and background AUCs on a fixed grid

use crate::error::RankError;
use crate::ranking::{RankingConfig, RankingTable, ScoreGroups};
use crate::report;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One factor's point on the ranked-dot plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPoint {
    /// 1-based report position
    pub position: usize,
    pub factor: String,
    pub neg_log10_pvalue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDotSeries {
    pub points: Vec<RankedPoint>,
    pub target_position: usize,
}

/// Fraction of scores strictly below each grid value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSeries {
    pub x: Vec<f64>,
    pub background: Vec<f64>,
    pub target: Vec<f64>,
}

/// Everything needed to draw both plots for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPlotData {
    pub target: String,
    pub ranked_dot: RankedDotSeries,
    pub cumulative: CumulativeSeries,
}

/// Ranked-dot series over the whole table, in report order
pub fn ranked_dot_series(table: &RankingTable, target: &str) -> Option<RankedDotSeries> {
    let target_position = table.position(target)?;

    let points = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| RankedPoint {
            position: i + 1,
            factor: row.factor.clone(),
            neg_log10_pvalue: -row.rank_avg_z_p_a_pvalue.log10(),
        })
        .collect();

    Some(RankedDotSeries {
        points,
        target_position,
    })
}

fn fraction_below(values: &[f64], x: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v < x).count() as f64 / values.len() as f64
}

/// Cumulative fractions on the grid `0, step, 2*step, ... < 1`
pub fn cumulative_series(groups: &ScoreGroups, target: &str, step: f64) -> Option<CumulativeSeries> {
    let target_scores = groups.get(target)?;
    let background = groups.background();

    let steps = (1.0 / step).ceil() as usize;
    let x: Vec<f64> = (0..steps)
        .map(|i| i as f64 * step)
        .filter(|&xi| xi < 1.0)
        .collect();

    Some(CumulativeSeries {
        background: x.iter().map(|&xi| fraction_below(background, xi)).collect(),
        target: x.iter().map(|&xi| fraction_below(target_scores, xi)).collect(),
        x,
    })
}

/// Build plot data for each target present in both the table and the groups
///
/// Unknown targets, and ids that could not be used as a file name, are
/// skipped with a warning.
pub fn build_plot_data(
    table: &RankingTable,
    groups: &ScoreGroups,
    targets: &[String],
    config: &RankingConfig,
) -> Vec<TargetPlotData> {
    targets
        .iter()
        .filter_map(|target| {
            if target.contains(['/', '\\']) {
                tracing::warn!("Target {} contains a path separator, skipping", target);
                return None;
            }
            let ranked_dot = ranked_dot_series(table, target);
            let cumulative = cumulative_series(groups, target, config.cumulative_step);
            match (ranked_dot, cumulative) {
                (Some(ranked_dot), Some(cumulative)) => Some(TargetPlotData {
                    target: target.clone(),
                    ranked_dot,
                    cumulative,
                }),
                _ => {
                    tracing::warn!("Target {} is not among the ranked factors, skipping", target);
                    None
                }
            }
        })
        .collect()
}

/// Directory holding plot data for a run
pub fn plot_dir(outdir: &Path, prefix: &str) -> PathBuf {
    outdir.join(format!("{}_plot", prefix))
}

/// Write one JSON file per target into a freshly created `dir`
///
/// Returns the written paths. `dir` must not exist yet.
pub fn write_plot_data(plots: &[TargetPlotData], dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.exists() {
        return Err(RankError::OutputCollision {
            path: dir.to_path_buf(),
        }
        .into());
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create plot directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(plots.len());
    for plot in plots {
        let path = dir.join(format!("{}_plot_data.json", plot.target));
        let json = serde_json::to_string_pretty(plot).context("Failed to serialize plot data")?;
        report::create_output(&path)?
            .write_all(json.as_bytes())
            .with_context(|| format!("Failed to write plot data {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::{rank_groups, Baseline, BaselineTable, SampleScore, TOLERANCE};
    use tempfile::TempDir;

    fn fixture() -> (RankingTable, ScoreGroups) {
        let samples = vec![
            SampleScore::new("A_1", 0.9),
            SampleScore::new("A_2", 0.8),
            SampleScore::new("B_1", 0.5),
            SampleScore::new("B_2", 0.4),
            SampleScore::new("C_1", 0.1),
            SampleScore::new("C_2", 0.2),
        ];
        let groups = ScoreGroups::from_samples(&samples, '_');
        let baselines: BaselineTable = ["A", "B", "C"]
            .iter()
            .map(|f| (f.to_string(), Baseline { mean: 0.0, std: 1.0 }))
            .collect();
        let table = rank_groups(&groups, &baselines, &RankingConfig::default()).unwrap();
        (table, groups)
    }

    #[test]
    fn test_ranked_dot_series() {
        let (table, _) = fixture();
        let series = ranked_dot_series(&table, "B").unwrap();

        assert_eq!(series.target_position, 2);
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].factor, "A");

        let expected = -(0.99f64.powi(3) / 6.0).log10();
        assert!((series.points[0].neg_log10_pvalue - expected).abs() < 1e-6);
        // More significant factors sit higher on the plot
        assert!(series.points[0].neg_log10_pvalue > series.points[2].neg_log10_pvalue);
    }

    #[test]
    fn test_cumulative_series_grid() {
        let (_, groups) = fixture();
        let series = cumulative_series(&groups, "A", 0.01).unwrap();

        assert_eq!(series.x.len(), 100);
        assert_eq!(series.x[0], 0.0);
        assert!((series.x[99] - 0.99).abs() < TOLERANCE);

        // At x = 0.5: background {0.1, 0.2, 0.4} below, target none
        assert!((series.background[50] - 0.5).abs() < TOLERANCE);
        assert_eq!(series.target[50], 0.0);
        assert_eq!(series.target[99], 1.0);
    }

    #[test]
    fn test_unknown_target_is_skipped() {
        let (table, groups) = fixture();
        let targets = vec!["A".to_string(), "NOPE".to_string()];
        let plots = build_plot_data(&table, &groups, &targets, &RankingConfig::default());
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0].target, "A");
    }

    #[test]
    fn test_target_with_path_separator_is_skipped() {
        let samples = vec![
            SampleScore::new("A_1", 0.9),
            SampleScore::new("../evil_1", 0.2),
            SampleScore::new("dir\\evil_1", 0.3),
        ];
        let groups = ScoreGroups::from_samples(&samples, '_');
        let baselines: BaselineTable = ["A", "../evil", "dir\\evil"]
            .iter()
            .map(|f| (f.to_string(), Baseline { mean: 0.0, std: 1.0 }))
            .collect();
        let table = rank_groups(&groups, &baselines, &RankingConfig::default()).unwrap();

        let targets = vec![
            "../evil".to_string(),
            "dir\\evil".to_string(),
            "A".to_string(),
        ];
        let plots = build_plot_data(&table, &groups, &targets, &RankingConfig::default());
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0].target, "A");
    }

    #[test]
    fn test_write_plot_data_files() {
        let (table, groups) = fixture();
        let tmp = TempDir::new().unwrap();
        let dir = plot_dir(tmp.path(), "run");
        let targets = vec!["A".to_string(), "C".to_string()];
        let plots = build_plot_data(&table, &groups, &targets, &RankingConfig::default());

        let written = write_plot_data(&plots, &dir).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.join("A_plot_data.json").exists());

        let text = std::fs::read_to_string(dir.join("C_plot_data.json")).unwrap();
        let parsed: TargetPlotData = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.ranked_dot.target_position, 3);
    }

    #[test]
    fn test_write_plot_data_refuses_existing_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = plot_dir(tmp.path(), "run");
        std::fs::create_dir(&dir).unwrap();

        let err = write_plot_data(&[], &dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RankError>(),
            Some(RankError::OutputCollision { .. })
        ));
    }
}
