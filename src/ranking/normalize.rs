// Z-score normalization of rank-sum statistics against per-factor baselines
//
// Baselines are the mean and standard deviation of each factor's statistic
// under a reference model, supplied from outside. A factor without a usable
// baseline aborts the run; no NaN or infinite z-score is ever produced.

use crate::error::{RankError, Result};
use crate::ranking::rank_sum::RankSumRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference mean/std of one factor's statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub mean: f64,
    pub std: f64,
}

/// Baselines keyed by factor id
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    entries: HashMap<String, Baseline>,
}

impl BaselineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, factor: impl Into<String>, baseline: Baseline) {
        self.entries.insert(factor.into(), baseline);
    }

    pub fn get(&self, factor: &str) -> Option<&Baseline> {
        self.entries.get(factor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Z-score of `score` for `factor`
    ///
    /// # Errors
    /// `MissingBaseline` if the factor has no row, a zero std, or non-finite values.
    pub fn zscore(&self, factor: &str, score: f64) -> Result<f64> {
        let missing = |reason: &str| RankError::MissingBaseline {
            factor: factor.to_string(),
            reason: reason.to_string(),
        };

        let baseline = self
            .get(factor)
            .ok_or_else(|| missing("no row in baseline table"))?;

        if !baseline.mean.is_finite() || !baseline.std.is_finite() {
            return Err(missing("mean/std are not finite"));
        }
        if baseline.std == 0.0 {
            return Err(missing("std is zero"));
        }

        Ok((score - baseline.mean) / baseline.std)
    }
}

impl FromIterator<(String, Baseline)> for BaselineTable {
    fn from_iter<I: IntoIterator<Item = (String, Baseline)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Rank-sum record with its normalized statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub rank_sum: RankSumRecord,
    pub zscore: f64,
}

/// Attach a z-score to every record
///
/// Fails on the first factor without a usable baseline.
pub fn normalize(
    records: Vec<RankSumRecord>,
    baselines: &BaselineTable,
) -> Result<Vec<NormalizedRecord>> {
    records
        .into_iter()
        .map(|rank_sum| {
            let zscore = baselines.zscore(&rank_sum.factor, rank_sum.score)?;
            Ok(NormalizedRecord { rank_sum, zscore })
        })
        .collect()
}
