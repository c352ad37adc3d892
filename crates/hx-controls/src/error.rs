//! Error types for control system operations.

use thiserror::Error;

/// Result type for control system operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur when configuring control primitives.
///
/// The per-step paths (`PIDController::update`, `check_settled`, clock ticks)
/// are infallible; only constructors validate their arguments.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<hx_core::HxError> for ControlError {
    fn from(e: hx_core::HxError) -> Self {
        match e {
            hx_core::HxError::NonFinite { what, .. } | hx_core::HxError::InvalidArg { what } => {
                ControlError::InvalidArg { what }
            }
        }
    }
}
