//! PID controller for the heating valve.
//!
//! Parallel form: `u = kp*e + ki*∫e dt + kd*de/dt`, clamped to the valve
//! fraction range `[0, 1]`.
//!
//! The integral accumulator has no windup limit of its own. Windup is bounded
//! only by the output clamp, so a long saturation period produces overshoot
//! once the error changes sign.

use serde::{Deserialize, Serialize};

/// Valve fraction limits applied to the controller output.
const OUT_MIN: f64 = 0.0;
const OUT_MAX: f64 = 1.0;

/// PID controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PIDController {
    /// Proportional gain (valve fraction per °C of error).
    pub kp: f64,
    /// Integral gain (valve fraction per °C·s).
    pub ki: f64,
    /// Derivative gain (valve fraction per °C/s).
    pub kd: f64,
}

impl PIDController {
    /// Create a new PID controller from parallel-form gains.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Compute controller output given process variable and setpoint.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller memory from the previous invocation
    /// * `pv` - Process variable (measured temperature)
    /// * `sp` - Setpoint (target temperature)
    /// * `dt` - Time since last update (seconds, must be positive)
    ///
    /// # Returns
    ///
    /// Updated memory and the clamped output together with the error that
    /// produced it.
    ///
    /// On the first call after a reset `state.previous_error` is `None` and the
    /// derivative term is exactly zero.
    pub fn update(
        &self,
        state: &PIDControllerState,
        pv: f64,
        sp: f64,
        dt: f64,
    ) -> (PIDControllerState, PidOutput) {
        // Error: e = sp - pv (positive error means the plant is too cold)
        let error = sp - pv;

        let integral = state.integral + error * dt;

        let previous_error = state.previous_error.unwrap_or(error);
        let derivative = (error - previous_error) / dt;

        let output_raw = self.kp * error + self.ki * integral + self.kd * derivative;
        let actuation = output_raw.clamp(OUT_MIN, OUT_MAX);

        let new_state = PIDControllerState {
            integral,
            previous_error: Some(error),
        };

        (new_state, PidOutput { actuation, error })
    }
}

/// Result of a single controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    /// Valve fraction in `[0, 1]`.
    pub actuation: f64,
    /// `setpoint - measured` that drove this output.
    pub error: f64,
}

/// PID controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PIDControllerState {
    /// Integral accumulator (sum of error·dt).
    pub integral: f64,
    /// Error seen on the previous invocation, `None` until the first one.
    pub previous_error: Option<f64>,
}
