//! SomErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable code string for logs
/// and result exports.
pub trait SomErrorCode {
    /// Returns the error code string (e.g., "DUPLICATE_LINK").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const DISTRIBUTION_ERROR: &str = "DISTRIBUTION_ERROR";
pub const SURVEY_ERROR: &str = "SURVEY_ERROR";
pub const DUPLICATE_LINK: &str = "DUPLICATE_LINK";
pub const LINK_ERROR: &str = "LINK_ERROR";
pub const CASE_ERROR: &str = "CASE_ERROR";
pub const REDUCTION_OVERFLOW: &str = "REDUCTION_OVERFLOW";
pub const PROPAGATION_ERROR: &str = "PROPAGATION_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INPUT_ERROR: &str = "INPUT_ERROR";
