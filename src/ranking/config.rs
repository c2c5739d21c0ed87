// Configuration for factor ranking
//
// Defaults reproduce the published ranking procedure. A TOML file can
// override any field; CLI flags override the file.

use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for factor ranking
///
/// # Example
/// ```
/// use regrank::ranking::RankingConfig;
///
/// let config = RankingConfig::default();
/// assert_eq!(config.delimiter, '_');
/// assert_eq!(config.composite_scale, 0.33);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Separator between factor id and the rest of a sample key
    ///
    /// `STAT3_GSM1234` belongs to factor `STAT3` with the default `_`.
    pub delimiter: char,

    /// Multiplier applied to the summed z-score, p-value and AUC ranks
    /// before dividing by the number of factors
    ///
    /// Must lie in (0, 1/3] so that three times the composite never leaves
    /// the Irwin-Hall support [0, 3].
    ///
    /// Default: 0.33
    pub composite_scale: f64,

    /// File name suffix appended to the output prefix for the report
    ///
    /// Default: `_results.txt`
    pub report_suffix: String,

    /// Grid step of the cumulative-fraction curves in plot data
    ///
    /// Default: 0.01 (100 points over [0, 1))
    pub cumulative_step: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            delimiter: '_',
            composite_scale: 0.33,
            report_suffix: "_results.txt".to_string(),
            cumulative_step: 0.01,
        }
    }
}

impl RankingConfig {
    /// Load a configuration from a TOML file; missing fields take defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| RankError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.composite_scale > 0.0 && self.composite_scale <= 1.0 / 3.0) {
            return Err(RankError::InvalidConfig(format!(
                "composite_scale must be in (0, 1/3], got {}",
                self.composite_scale
            )));
        }

        if !(self.cumulative_step > 0.0 && self.cumulative_step < 1.0) {
            return Err(RankError::InvalidConfig(format!(
                "cumulative_step must be in (0, 1), got {}",
                self.cumulative_step
            )));
        }

        if self.delimiter.is_whitespace() {
            return Err(RankError::InvalidConfig(
                "delimiter must not be whitespace".to_string(),
            ));
        }

        if self.report_suffix.is_empty() || self.report_suffix.contains(['/', '\\']) {
            return Err(RankError::InvalidConfig(format!(
                "report_suffix must be a non-empty file name fragment, got '{}'",
                self.report_suffix
            )));
        }

        Ok(())
    }
}
