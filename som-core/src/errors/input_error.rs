//! Input table loading errors.

use super::error_code::{self, SomErrorCode};
use super::{CaseError, LinkError, SurveyError};

/// Errors raised while loading or validating the input tables.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read input file {path}: {message}")]
    Io { path: String, message: String },

    #[error("cannot parse input tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid link table: {0}")]
    Link(#[from] LinkError),

    #[error("invalid case table: {0}")]
    Case(#[from] CaseError),

    #[error("survey ingestion failed: {0}")]
    Survey(#[from] SurveyError),
}

impl SomErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Link(e) => e.error_code(),
            Self::Case(e) => e.error_code(),
            Self::Survey(e) => e.error_code(),
            _ => error_code::INPUT_ERROR,
        }
    }
}
