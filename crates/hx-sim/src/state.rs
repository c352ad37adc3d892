//! Simulation state, control parameters and the snapshot handed to hosts.

use hx_controls::{Mode, PIDController, percent_error};
use serde::{Deserialize, Serialize};

/// Operator-tunable loop parameters.
///
/// May be replaced between steps; a change is picked up by the next step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlParameters {
    /// Target temperature (°C). Must be bounded away from zero.
    pub setpoint: f64,
    /// Settling band as a percentage of the setpoint.
    pub tolerance: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for ControlParameters {
    fn default() -> Self {
        Self {
            setpoint: 50.0,
            tolerance: 2.0,
            kp: 1.0,
            ki: 0.05,
            kd: 0.1,
        }
    }
}

impl ControlParameters {
    pub fn controller(&self) -> PIDController {
        PIDController::new(self.kp, self.ki, self.kd)
    }
}

/// Mutable plant-side state owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Plant temperature (°C).
    pub temperature: f64,
    /// Simulated time since reset (seconds).
    pub time: f64,
    /// Steps taken since reset.
    pub step_count: u64,
    /// Valve fraction applied on the last step, in `[0, 1]`.
    pub actuation_fraction: f64,
    /// Time the error first entered the tolerance band, if it has.
    pub settling_time: Option<f64>,
}

impl SimulationState {
    pub fn initial(temperature: f64) -> Self {
        Self {
            temperature,
            time: 0.0,
            step_count: 0,
            actuation_fraction: 0.0,
            settling_time: None,
        }
    }
}

/// Read-only view of a completed step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub temperature: f64,
    pub setpoint: f64,
    pub time: f64,
    pub step_count: u64,
    /// Valve opening, 0 to 100.
    pub actuation_percent: f64,
    /// Selected actuation source.
    pub mode: Mode,
    /// Mode as shown to the operator (`Automatic` only while running).
    pub display_mode: Mode,
    pub running: bool,
    pub settling_time: Option<f64>,
}

impl Snapshot {
    /// Unsigned error as a percentage of the setpoint.
    pub fn error_percent(&self) -> f64 {
        percent_error(self.setpoint, self.temperature)
    }

    /// Signed error as a percentage of the setpoint (positive below setpoint).
    pub fn signed_error_percent(&self) -> f64 {
        (self.setpoint - self.temperature) / self.setpoint * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_at(temperature: f64) -> Snapshot {
        Snapshot {
            temperature,
            setpoint: 50.0,
            time: 0.0,
            step_count: 0,
            actuation_percent: 0.0,
            mode: Mode::Manual,
            display_mode: Mode::Manual,
            running: false,
            settling_time: None,
        }
    }

    #[test]
    fn control_defaults() {
        let params = ControlParameters::default();
        assert_eq!(params.setpoint, 50.0);
        assert_eq!(params.tolerance, 2.0);
        let pid = params.controller();
        assert_eq!((pid.kp, pid.ki, pid.kd), (1.0, 0.05, 0.1));
    }

    #[test]
    fn error_percent_sign_conventions() {
        let cold = snapshot_at(40.0);
        assert!((cold.error_percent() - 20.0).abs() < 1e-12);
        assert!((cold.signed_error_percent() - 20.0).abs() < 1e-12);

        let hot = snapshot_at(60.0);
        assert!((hot.error_percent() - 20.0).abs() < 1e-12);
        assert!((hot.signed_error_percent() + 20.0).abs() < 1e-12);
    }

    #[test]
    fn initial_state_is_zeroed() {
        let state = SimulationState::initial(35.0);
        assert_eq!(state.temperature, 35.0);
        assert_eq!(state.time, 0.0);
        assert_eq!(state.step_count, 0);
        assert_eq!(state.actuation_fraction, 0.0);
        assert_eq!(state.settling_time, None);
    }
}
