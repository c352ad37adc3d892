//! Settling-time detection.
//!
//! Settling is the first instant the percent error falls within tolerance.
//! The latch is first-entry only: drifting back out of the band later does
//! not clear or move it. Only a simulation reset re-arms it.

/// Absolute error as a percentage of the setpoint.
///
/// `setpoint` must be non-zero; the caller's parameter ranges guarantee it.
pub fn percent_error(setpoint: f64, measured: f64) -> f64 {
    ((setpoint - measured) / setpoint).abs() * 100.0
}

/// Evaluate the settling latch.
///
/// Returns `already_settled_at` unchanged once it is set. Otherwise returns
/// `Some(now)` when the percent error is within `tolerance` (percent) and
/// `None` when it is not.
pub fn check_settled(
    setpoint: f64,
    measured: f64,
    tolerance: f64,
    already_settled_at: Option<f64>,
    now: f64,
) -> Option<f64> {
    if already_settled_at.is_some() {
        return already_settled_at;
    }
    if percent_error(setpoint, measured) <= tolerance {
        Some(now)
    } else {
        None
    }
}
