// User-facing validation errors

use thiserror::Error;

/// Input rejected before any state change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Task text was empty after trimming
    #[error("task text cannot be empty")]
    EmptyText,
}

/// Returns the validation error carried by `report`, if that is what it is
pub fn as_validation(report: &eyre::Report) -> Option<&ValidationError> {
    report.downcast_ref::<ValidationError>()
}
