//! Distribution synthesis and sampling errors.

use super::error_code::{self, SomErrorCode};

/// Errors raised while building or sampling empirical distributions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("expected {expected} buckets, got {actual}")]
    WrongBucketCount { expected: usize, actual: usize },

    #[error("bucket {index} has invalid weight {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("distribution has no mass")]
    EmptyDistribution,

    #[error("expert inputs have mismatched lengths: expected {expecteds}, lower {lowers}, upper {uppers}, weights {weights}")]
    MismatchedInputs {
        expecteds: usize,
        lowers: usize,
        uppers: usize,
        weights: usize,
    },

    #[error("invalid PERT parameters (low {low}, peak {peak}, high {high}): {reason}")]
    InvalidPert {
        low: f64,
        peak: f64,
        high: f64,
        reason: String,
    },
}

impl SomErrorCode for DistributionError {
    fn error_code(&self) -> &'static str {
        error_code::DISTRIBUTION_ERROR
    }
}
