use thiserror::Error;

pub type HxResult<T> = Result<T, HxError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HxError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
