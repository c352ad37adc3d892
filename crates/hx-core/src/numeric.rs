use crate::HxError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, HxError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HxError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero (time constants, step sizes).
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, HxError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HxError::InvalidArg { what })
    }
}
