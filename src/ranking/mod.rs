// Factor ranking: rank-sum scoring, normalization and Irwin-Hall aggregation
//
// The pipeline is a chain of pure transformations over immutable record sets:
//
//   samples -> ScoreGroups -> RankSumRecord -> NormalizedRecord
//           -> RankedRecord -> RankingTable
//
// Each stage can be run and tested on its own. Aggregation needs every
// per-factor record, so it only starts once scoring and normalization of all
// factors are complete.

mod aggregate;
mod combinatorics;
mod config;
mod grouping;
mod irwin_hall;
mod normalize;
mod rank_sum;

pub use aggregate::{
    aggregate, assign_ranks, composite_pvalue, composite_rank, CriterionRanks, FactorStatistics,
    RankedRecord, RankingTable,
};
pub use combinatorics::{factorial, logfac, STIRLING_THRESHOLD};
pub use config::RankingConfig;
pub use grouping::{factor_id, SampleScore, ScoreGroups};
pub use irwin_hall::{irwin_hall_cdf, COMPOSITE_COMPONENTS};
pub use normalize::{normalize, Baseline, BaselineTable, NormalizedRecord};
pub use rank_sum::{score_factors, standard_normal_sf, RankSumRecord, RankSumTest, SortedBackground};

use crate::error::{RankError, Result};

/// Absolute tolerance for floating-point comparisons of probabilities and statistics
pub const TOLERANCE: f64 = 1e-9;

/// Run the whole ranking pipeline over grouped scores
///
/// # Errors
/// - `EmptyInput` if there are no non-empty factor groups
/// - `NonFiniteScore` if any score is NaN or infinite
/// - `MissingBaseline` if any factor lacks a usable baseline
/// - `InvalidConfig` if `config` fails validation
///
/// # Example
/// ```
/// use regrank::ranking::{rank_groups, Baseline, BaselineTable, RankingConfig, SampleScore, ScoreGroups};
///
/// let samples = vec![
///     SampleScore::new("A_1", 0.9),
///     SampleScore::new("A_2", 0.8),
///     SampleScore::new("B_1", 0.3),
/// ];
/// let groups = ScoreGroups::from_samples(&samples, '_');
/// let baselines: BaselineTable = ["A", "B"]
///     .iter()
///     .map(|f| (f.to_string(), Baseline { mean: 0.0, std: 1.0 }))
///     .collect();
///
/// let table = rank_groups(&groups, &baselines, &RankingConfig::default()).unwrap();
/// assert_eq!(table.rows()[0].factor, "A");
/// ```
pub fn rank_groups(
    groups: &ScoreGroups,
    baselines: &BaselineTable,
    config: &RankingConfig,
) -> Result<RankingTable> {
    config.validate()?;
    if groups.is_empty() {
        return Err(RankError::EmptyInput);
    }
    if let Some((factor, value)) = groups.first_non_finite() {
        return Err(RankError::NonFiniteScore {
            factor: factor.to_string(),
            value,
        });
    }

    tracing::info!("Statistical tests start ({} factors)", groups.len());
    let scored = score_factors(groups);

    let normalized = normalize(scored, baselines)?;
    tracing::info!("Normalized {} factor statistics", normalized.len());

    let ranked = assign_ranks(normalized);
    let table = aggregate(ranked, config)?;
    tracing::info!("Ranked {} factors", table.len());

    Ok(table)
}

/// Group raw sample scores by factor and run [`rank_groups`]
pub fn rank_factors(
    samples: &[SampleScore],
    baselines: &BaselineTable,
    config: &RankingConfig,
) -> Result<RankingTable> {
    let groups = ScoreGroups::from_samples(samples, config.delimiter);
    rank_groups(&groups, baselines, config)
}
