//! Replicate errors and non-fatal failure collection.

use super::error_code::SomErrorCode;
use super::{LinkError, PropagationError};

/// Errors that abort a single replicate after the inputs were validated:
/// link sampling and propagation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplicateError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
}

impl SomErrorCode for ReplicateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Link(e) => e.error_code(),
            Self::Propagation(e) => e.error_code(),
        }
    }
}

/// A replicate that failed and was dropped from aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateFailure {
    pub replicate: u32,
    pub error: ReplicateError,
}

/// Result of a multi-replicate run that accumulates non-fatal failures.
/// Successful replicates are kept even when some replicates fail.
#[derive(Debug, Default)]
pub struct RunResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Replicates that failed.
    pub errors: Vec<ReplicateFailure>,
}

impl<T: Default> RunResult<T> {
    /// Create a new result with no failures.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Record a failed replicate.
    pub fn add_error(&mut self, replicate: u32, error: ReplicateError) {
        self.errors.push(ReplicateFailure { replicate, error });
    }

    /// Returns true if no replicate failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of failed replicates.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
