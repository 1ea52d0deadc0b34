//! Error handling for SOM.
//! One error enum per subsystem, `thiserror` only.

pub mod case_error;
pub mod config_error;
pub mod distribution_error;
pub mod error_code;
pub mod input_error;
pub mod link_error;
pub mod propagation_error;
pub mod replicate_error;
pub mod survey_error;

pub use case_error::CaseError;
pub use config_error::ConfigError;
pub use distribution_error::DistributionError;
pub use error_code::SomErrorCode;
pub use input_error::InputError;
pub use link_error::LinkError;
pub use propagation_error::PropagationError;
pub use replicate_error::{ReplicateError, ReplicateFailure, RunResult};
pub use survey_error::SurveyError;
