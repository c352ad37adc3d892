//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while configuring or running a simulation.
///
/// Stepping itself cannot fail; these only come from construction and
/// headless run options.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Control error: {0}")]
    Control(#[from] hx_controls::ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
