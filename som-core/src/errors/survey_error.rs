//! Survey ingestion errors. These are load-time failures that halt a run
//! before any replicate starts.

use super::error_code::{self, SomErrorCode};
use super::DistributionError;

/// Errors raised while turning survey answers into input tables.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("survey {survey}: expert {expert} gave {actual} answers, expected {expected}")]
    InconsistentAnswerCount {
        survey: u32,
        expert: u32,
        expected: usize,
        actual: usize,
    },

    #[error("block {block}: expert {expert} has {actual} answers for {expected} measures")]
    BlockShapeMismatch {
        block: u32,
        expert: usize,
        expected: usize,
        actual: usize,
    },

    #[error("question {question}: expert lists {count} pressures, at most {max} allowed")]
    TooManyPressures {
        question: u32,
        count: usize,
        max: usize,
    },

    #[error("distribution synthesis failed: {0}")]
    Distribution(#[from] DistributionError),
}

impl SomErrorCode for SurveyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Distribution(e) => e.error_code(),
            _ => error_code::SURVEY_ERROR,
        }
    }
}
