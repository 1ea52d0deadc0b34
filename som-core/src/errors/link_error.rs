//! Link builder errors.

use super::error_code::{self, SomErrorCode};
use crate::types::LinkKey;

/// Errors raised while building the Measure-Activity-Pressure-State table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    #[error("duplicate link {key}")]
    DuplicateLink { key: LinkKey },

    #[error("overlap multiplier {multiplier} for measure {overlapped} is outside [0, 1]")]
    InvalidOverlapMultiplier { overlapped: u32, multiplier: f64 },
}

impl SomErrorCode for LinkError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateLink { .. } => error_code::DUPLICATE_LINK,
            Self::InvalidOverlapMultiplier { .. } => error_code::LINK_ERROR,
        }
    }
}
