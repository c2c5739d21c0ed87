// Multi-criterion rank aggregation
//
// Four strict rankings over the factor set (statistic, z-score, p-value,
// max AUC) are combined into a composite rank fraction whose significance is
// read off the Irwin-Hall distribution with three components.
//
// Tie-break: equal keys are ordered by ascending factor id, so ranks never
// depend on input order.

use crate::error::Result;
use crate::ranking::config::RankingConfig;
use crate::ranking::irwin_hall::{irwin_hall_cdf, COMPOSITE_COMPONENTS};
use crate::ranking::normalize::NormalizedRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Position (1-based) of a factor under each ranking criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRanks {
    /// Descending statistic
    pub score: usize,
    /// Descending z-score
    pub zscore: usize,
    /// Ascending p-value
    pub pvalue: usize,
    /// Descending max AUC
    pub auc: usize,
}

/// Normalized record with its four criterion ranks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub normalized: NormalizedRecord,
    pub ranks: CriterionRanks,
}

/// Final per-factor statistics row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorStatistics {
    pub factor: String,
    pub score: f64,
    pub pvalue: f64,
    pub max_auc: f64,
    pub zscore: f64,
    pub rank_score: usize,
    pub rank_zscore: usize,
    pub rank_pvalue: usize,
    pub rank_auc: usize,
    /// Mean of z-score and p-value ranks
    pub rank_avg_z_p: f64,
    /// Scaled sum of z-score, p-value and AUC ranks over the factor count
    pub rank_avg_z_p_a: f64,
    /// Irwin-Hall CDF of `3 * rank_avg_z_p_a`
    pub rank_avg_z_p_a_pvalue: f64,
}

/// Ranked factors, most significant first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    rows: Vec<FactorStatistics>,
}

impl RankingTable {
    pub fn rows(&self) -> &[FactorStatistics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, factor: &str) -> Option<&FactorStatistics> {
        self.rows.iter().find(|r| r.factor == factor)
    }

    /// 1-based position of `factor` in report order
    pub fn position(&self, factor: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.factor == factor).map(|i| i + 1)
    }
}

/// 1-based ranks of `records` under `cmp`, ties broken by factor id
fn rank_by<F>(records: &[NormalizedRecord], cmp: F) -> Vec<usize>
where
    F: Fn(&NormalizedRecord, &NormalizedRecord) -> Ordering,
{
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        cmp(&records[a], &records[b])
            .then_with(|| records[a].rank_sum.factor.cmp(&records[b].rank_sum.factor))
    });

    let mut ranks = vec![0; records.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// Rank factors under each of the four criteria
pub fn assign_ranks(records: Vec<NormalizedRecord>) -> Vec<RankedRecord> {
    let by_score = rank_by(&records, |a, b| b.rank_sum.score.total_cmp(&a.rank_sum.score));
    let by_zscore = rank_by(&records, |a, b| b.zscore.total_cmp(&a.zscore));
    let by_pvalue = rank_by(&records, |a, b| a.rank_sum.pvalue.total_cmp(&b.rank_sum.pvalue));
    let by_auc = rank_by(&records, |a, b| b.rank_sum.max_auc.total_cmp(&a.rank_sum.max_auc));

    records
        .into_iter()
        .enumerate()
        .map(|(i, normalized)| RankedRecord {
            normalized,
            ranks: CriterionRanks {
                score: by_score[i],
                zscore: by_zscore[i],
                pvalue: by_pvalue[i],
                auc: by_auc[i],
            },
        })
        .collect()
}

/// Composite rank fraction from z-score, p-value and AUC ranks
///
/// Bounded by `3 * composite_scale`, so `3 * value` never exceeds 3 for a
/// validated configuration.
pub fn composite_rank(ranks: &CriterionRanks, factor_count: usize, composite_scale: f64) -> f64 {
    (ranks.zscore + ranks.pvalue + ranks.auc) as f64 * composite_scale / factor_count as f64
}

/// Irwin-Hall significance of a composite rank fraction
pub fn composite_pvalue(composite: f64) -> Result<f64> {
    irwin_hall_cdf(
        COMPOSITE_COMPONENTS as f64 * composite,
        COMPOSITE_COMPONENTS,
    )
}

/// Combine criterion ranks into composites and order rows by significance
pub fn aggregate(ranked: Vec<RankedRecord>, config: &RankingConfig) -> Result<RankingTable> {
    let factor_count = ranked.len();

    let mut rows = ranked
        .into_iter()
        .map(|RankedRecord { normalized, ranks }| {
            let composite = composite_rank(&ranks, factor_count, config.composite_scale);
            let composite_p = composite_pvalue(composite)?;
            let rank_sum = normalized.rank_sum;
            Ok(FactorStatistics {
                factor: rank_sum.factor,
                score: rank_sum.score,
                pvalue: rank_sum.pvalue,
                max_auc: rank_sum.max_auc,
                zscore: normalized.zscore,
                rank_score: ranks.score,
                rank_zscore: ranks.zscore,
                rank_pvalue: ranks.pvalue,
                rank_auc: ranks.auc,
                rank_avg_z_p: (ranks.zscore + ranks.pvalue) as f64 / 2.0,
                rank_avg_z_p_a: composite,
                rank_avg_z_p_a_pvalue: composite_p,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    rows.sort_by(|a, b| {
        a.rank_avg_z_p_a
            .total_cmp(&b.rank_avg_z_p_a)
            .then_with(|| a.factor.cmp(&b.factor))
    });

    Ok(RankingTable { rows })
}
