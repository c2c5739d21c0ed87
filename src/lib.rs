//! regrank - rank transcription factors by AUC deviation from background
//!
//! Each factor's AUC scores are compared against every score in the run with
//! a one-sided Wilcoxon rank-sum test, normalized against external baselines,
//! and ranked under several criteria. The combined rank is turned into a
//! significance value through the Irwin-Hall distribution.

pub mod cli;
pub mod error;
pub mod inputs;
pub mod plot_data;
pub mod ranking;
pub mod report;

pub use error::RankError;
