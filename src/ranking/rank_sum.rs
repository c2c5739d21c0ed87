// Wilcoxon rank-sum scoring of each factor against the full background
//
// For a factor with scores S and background B (every score, S included),
// ranks are taken over the pooled sample S ++ B with tied values sharing the
// average rank of their tie group. The statistic is the classic large-sample
// rank-sums z:
//
//   z = (R_S - n1(n1+n2+1)/2) / sqrt(n1*n2*(n1+n2+1)/12)
//
// with no tie correction in the variance. The one-sided p-value tests
// "S is shifted above background".
//
// Ranks are computed by binary search over sorted copies of S and B, so each
// factor costs O(n1 log n) instead of re-sorting the pooled sample.

use crate::ranking::grouping::ScoreGroups;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Rank-sum result for one factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSumRecord {
    pub factor: String,
    /// Signed rank-sum z statistic (positive = above background)
    pub score: f64,
    /// One-sided p-value for enrichment over background
    pub pvalue: f64,
    /// Largest AUC observed for the factor
    pub max_auc: f64,
}

/// Two-sample rank-sum test result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSumTest {
    pub statistic: f64,
    /// Two-sided p-value
    pub pvalue: f64,
}

impl RankSumTest {
    /// One-sided p-value for the alternative "first sample is larger"
    pub fn one_sided_greater(&self) -> f64 {
        if self.statistic > 0.0 {
            self.pvalue / 2.0
        } else {
            1.0 - self.pvalue / 2.0
        }
    }
}

/// Background sorted once and shared by every factor's test
#[derive(Debug, Clone)]
pub struct SortedBackground {
    values: Vec<f64>,
}

impl SortedBackground {
    pub fn new(background: &[f64]) -> Self {
        let mut values = background.to_vec();
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compare `sample` against this background
    ///
    /// Returns `None` when either side is empty.
    pub fn rank_sum_test(&self, sample: &[f64]) -> Option<RankSumTest> {
        if sample.is_empty() || self.values.is_empty() {
            return None;
        }

        let mut sorted_sample = sample.to_vec();
        sorted_sample.sort_by(f64::total_cmp);

        let n1 = sample.len() as f64;
        let n2 = self.values.len() as f64;

        let rank_sum: f64 = sorted_sample
            .iter()
            .map(|&v| {
                let (below_s, tied_s) = count_below_and_tied(&sorted_sample, v);
                let (below_b, tied_b) = count_below_and_tied(&self.values, v);
                let below = (below_s + below_b) as f64;
                let tied = (tied_s + tied_b) as f64;
                below + (tied + 1.0) / 2.0
            })
            .sum();

        let expected = n1 * (n1 + n2 + 1.0) / 2.0;
        let sigma = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
        let statistic = (rank_sum - expected) / sigma;
        let pvalue = 2.0 * standard_normal_sf(statistic.abs());

        Some(RankSumTest { statistic, pvalue })
    }
}

/// Survival function of the standard normal distribution
pub fn standard_normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

fn count_below_and_tied(sorted: &[f64], v: f64) -> (usize, usize) {
    let below = sorted.partition_point(|&x| x < v);
    let not_above = sorted.partition_point(|&x| x <= v);
    (below, not_above - below)
}

/// Score every factor group against the pooled background
///
/// Records come out in ascending factor-id order.
pub fn score_factors(groups: &ScoreGroups) -> Vec<RankSumRecord> {
    let background = SortedBackground::new(groups.background());
    tracing::debug!(
        "Rank-sum scoring {} factors against {} background scores",
        groups.len(),
        background.len()
    );

    groups
        .iter()
        .filter_map(|(factor, scores)| {
            let test = background.rank_sum_test(scores)?;
            let max_auc = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            tracing::trace!(
                "{}: z={:.4}, p2={:.4e}, max_auc={:.3}",
                factor,
                test.statistic,
                test.pvalue,
                max_auc
            );
            Some(RankSumRecord {
                factor: factor.to_string(),
                score: test.statistic,
                pvalue: test.one_sided_greater(),
                max_auc,
            })
        })
        .collect()
}
