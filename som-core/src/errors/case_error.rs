//! Case expansion errors.

use super::error_code::{self, SomErrorCode};

/// Errors raised while validating or expanding case specifications.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaseError {
    #[error("duplicate case id {id}")]
    DuplicateCaseId { id: u32 },

    #[error("case {id}: {field} {value} is outside [0, 1]")]
    FractionOutOfRange {
        id: u32,
        field: &'static str,
        value: f64,
    },
}

impl SomErrorCode for CaseError {
    fn error_code(&self) -> &'static str {
        error_code::CASE_ERROR
    }
}
