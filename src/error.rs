//! Error taxonomy for the ranking pipeline
//!
//! Every variant is fatal for a run: nothing here is retried, and no report
//! is written once one of these has been raised.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the ranking core and its input/output collaborators
#[derive(Error, Debug)]
pub enum RankError {
    /// Normalization is undefined for this factor
    #[error("No usable normalization baseline for factor '{factor}': {reason}")]
    MissingBaseline { factor: String, reason: String },

    /// Report file or plot directory is already present
    #[error("Output location already exists: {}, please select another directory", path.display())]
    OutputCollision { path: PathBuf },

    /// Irwin-Hall CDF evaluated outside its support
    #[error("Irwin-Hall CDF undefined at x={x} for n={n} (requires n >= 1 and 0 <= x <= n)")]
    NumericDomain { x: f64, n: u64 },

    #[error("No factor scores to rank")]
    EmptyInput,

    /// NaN or infinite AUC reached the ranking core
    #[error("Non-finite score {value} for factor '{factor}'")]
    NonFiniteScore { factor: String, value: f64 },

    #[error("Invalid input in {source_name} at line {line}: {message}")]
    InvalidInput {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_baseline_message_names_factor() {
        let err = RankError::MissingBaseline {
            factor: "STAT3".to_string(),
            reason: "no row in baseline table".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("STAT3"));
        assert!(msg.contains("no row in baseline table"));
    }

    #[test]
    fn test_output_collision_message_names_path() {
        let err = RankError::OutputCollision {
            path: PathBuf::from("/tmp/out/run_plot"),
        };
        assert!(err.to_string().contains("/tmp/out/run_plot"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RankError = io.into();
        assert!(matches!(err, RankError::Io(_)));
    }
}
