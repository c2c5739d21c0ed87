// Partition sample scores into factor groups
//
// A sample key encodes its factor as the prefix before the first delimiter.
// The background is every score of every factor, the factor's own included.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One scored sample (e.g. `STAT3_GSM1234` -> 0.87)
///
/// `auc` must be finite; [`rank_groups`](super::rank_groups) rejects NaN and
/// infinities with `NonFiniteScore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleScore {
    pub key: String,
    pub auc: f64,
}

impl SampleScore {
    pub fn new(key: impl Into<String>, auc: f64) -> Self {
        Self {
            key: key.into(),
            auc,
        }
    }

    /// Factor id: prefix of the key up to the first `delimiter`
    pub fn factor(&self, delimiter: char) -> &str {
        factor_id(&self.key, delimiter)
    }
}

/// Prefix of `key` up to the first `delimiter` (the whole key if absent)
pub fn factor_id(key: &str, delimiter: char) -> &str {
    key.split(delimiter).next().unwrap_or(key)
}

/// Scores grouped by factor, plus the pooled background
#[derive(Debug, Clone, Default)]
pub struct ScoreGroups {
    groups: BTreeMap<String, Vec<f64>>,
    background: Vec<f64>,
}

impl ScoreGroups {
    /// Group samples by factor prefix
    pub fn from_samples(samples: &[SampleScore], delimiter: char) -> Self {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for sample in samples {
            groups
                .entry(sample.factor(delimiter).to_string())
                .or_default()
                .push(sample.auc);
        }
        Self::from_groups(groups)
    }

    /// Build from pre-grouped scores; empty groups are dropped
    pub fn from_groups(groups: BTreeMap<String, Vec<f64>>) -> Self {
        let groups: BTreeMap<String, Vec<f64>> = groups
            .into_iter()
            .filter(|(factor, scores)| {
                if scores.is_empty() {
                    tracing::debug!("Skipping factor {} with no samples", factor);
                }
                !scores.is_empty()
            })
            .collect();
        let background = groups.values().flatten().copied().collect();
        Self { groups, background }
    }

    /// Factor groups in ascending factor-id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups.iter().map(|(f, s)| (f.as_str(), s.as_slice()))
    }

    pub fn get(&self, factor: &str) -> Option<&[f64]> {
        self.groups.get(factor).map(Vec::as_slice)
    }

    pub fn background(&self) -> &[f64] {
        &self.background
    }

    /// First score that is NaN or infinite, with its factor
    pub fn first_non_finite(&self) -> Option<(&str, f64)> {
        self.iter().find_map(|(factor, scores)| {
            scores
                .iter()
                .find(|v| !v.is_finite())
                .map(|&v| (factor, v))
        })
    }

    /// Number of non-empty factor groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
