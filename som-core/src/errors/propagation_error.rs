//! Change propagation errors.

use super::error_code::{self, SomErrorCode};

/// Fatal conditions inside one replicate's propagation loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropagationError {
    #[error(
        "combined reduction {reduction} exceeds 1 for state {state}, pressure {pressure}, area {area}"
    )]
    ReductionOverflow {
        state: u32,
        pressure: u32,
        area: u32,
        reduction: f64,
    },

    #[error("time_steps must be at least 1")]
    NoTimeSteps,
}

impl SomErrorCode for PropagationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ReductionOverflow { .. } => error_code::REDUCTION_OVERFLOW,
            Self::NoTimeSteps => error_code::PROPAGATION_ERROR,
        }
    }
}
