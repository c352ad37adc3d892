//! Scenario validation.
//!
//! The operator-facing fields carry the same limits as the input form of the
//! interactive tool. The engine assumes these limits hold; in particular the
//! setpoint range keeps percent-error computations away from zero.

use crate::schema::{LATEST_VERSION, ScenarioDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Out of range: {field} = {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Inclusive limits for an operator-tunable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    const fn new(field: &'static str, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Nearest allowed value; NaN maps to the lower limit.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    fn check(&self, value: f64) -> Result<(), ValidationError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(self.out_of_range(value))
        }
    }

    fn out_of_range(&self, value: f64) -> ValidationError {
        ValidationError::OutOfRange {
            field: self.field,
            value,
            min: self.min,
            max: self.max,
        }
    }
}

pub const INITIAL_TEMPERATURE: FieldRange = FieldRange::new("plant.initial_c", 0.0, 100.0);
pub const SETPOINT: FieldRange = FieldRange::new("control.setpoint_c", 20.0, 90.0);
pub const TOLERANCE: FieldRange = FieldRange::new("control.tolerance_pct", 0.5, 5.0);
pub const KP: FieldRange = FieldRange::new("control.kp", 0.1, 10.0);
pub const KI: FieldRange = FieldRange::new("control.ki", 0.01, 1.0);
pub const KD: FieldRange = FieldRange::new("control.kd", 0.0, 1.0);

fn ranged_values(scenario: &ScenarioDef) -> [(FieldRange, f64); 6] {
    [
        (INITIAL_TEMPERATURE, scenario.plant.initial_c),
        (SETPOINT, scenario.control.setpoint_c),
        (TOLERANCE, scenario.control.tolerance_pct),
        (KP, scenario.control.kp),
        (KI, scenario.control.ki),
        (KD, scenario.control.kd),
    ]
}

fn ranged_fields_mut(scenario: &mut ScenarioDef) -> [(FieldRange, &mut f64); 6] {
    [
        (INITIAL_TEMPERATURE, &mut scenario.plant.initial_c),
        (SETPOINT, &mut scenario.control.setpoint_c),
        (TOLERANCE, &mut scenario.control.tolerance_pct),
        (KP, &mut scenario.control.kp),
        (KI, &mut scenario.control.ki),
        (KD, &mut scenario.control.kd),
    ]
}

pub fn validate_scenario(scenario: &ScenarioDef) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let plant = &scenario.plant;
    if !(plant.tau_s.is_finite() && plant.tau_s > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "plant.tau_s",
            value: plant.tau_s.to_string(),
            reason: "time constant must be positive",
        });
    }
    for (field, value) in [
        ("plant.gain_c", plant.gain_c),
        ("plant.ambient_c", plant.ambient_c),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field,
                value: value.to_string(),
                reason: "must be finite",
            });
        }
    }

    for (range, value) in ranged_values(scenario) {
        range.check(value)?;
    }

    let sim = &scenario.simulation;
    if !(sim.dt_s.is_finite() && sim.dt_s > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "simulation.dt_s",
            value: sim.dt_s.to_string(),
            reason: "time step must be positive",
        });
    }
    if sim.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "simulation.record_every",
            value: "0".to_string(),
            reason: "must be at least 1",
        });
    }

    Ok(())
}

/// Pull every operator field back into its allowed range.
///
/// Returns one `OutOfRange` entry per field that had to be changed, carrying
/// the rejected value.
pub fn clamp_scenario(scenario: &mut ScenarioDef) -> Vec<ValidationError> {
    let mut adjusted = Vec::new();
    for (range, value) in ranged_fields_mut(scenario) {
        if !range.contains(*value) {
            let clamped = range.clamp(*value);
            tracing::warn!(
                field = range.field,
                value = *value,
                clamped,
                "value out of range, clamped"
            );
            adjusted.push(range.out_of_range(*value));
            *value = clamped;
        }
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_is_valid() {
        validate_scenario(&ScenarioDef::default()).unwrap();
    }

    #[test]
    fn setpoint_below_range_is_rejected() {
        let mut scenario = ScenarioDef::default();
        scenario.control.setpoint_c = 10.0;
        let err = validate_scenario(&scenario).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "control.setpoint_c",
                value: 10.0,
                min: 20.0,
                max: 90.0,
            }
        );
    }

    #[test]
    fn nan_gain_is_rejected() {
        let mut scenario = ScenarioDef::default();
        scenario.control.kp = f64::NAN;
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn non_positive_tau_and_dt_are_rejected() {
        let mut scenario = ScenarioDef::default();
        scenario.plant.tau_s = 0.0;
        assert!(validate_scenario(&scenario).is_err());

        let mut scenario = ScenarioDef::default();
        scenario.simulation.dt_s = -0.1;
        assert!(validate_scenario(&scenario).is_err());

        let mut scenario = ScenarioDef::default();
        scenario.simulation.record_every = 0;
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn future_version_is_rejected() {
        let scenario = ScenarioDef {
            version: LATEST_VERSION + 1,
            ..ScenarioDef::default()
        };
        assert_eq!(
            validate_scenario(&scenario),
            Err(ValidationError::UnsupportedVersion {
                version: LATEST_VERSION + 1
            })
        );
    }

    #[test]
    fn clamp_pulls_fields_into_range() {
        let mut scenario = ScenarioDef::default();
        scenario.control.setpoint_c = 120.0;
        scenario.control.ki = f64::NAN;
        scenario.plant.initial_c = -5.0;

        let adjusted = clamp_scenario(&mut scenario);
        assert_eq!(adjusted.len(), 3);
        assert_eq!(scenario.control.setpoint_c, 90.0);
        assert_eq!(scenario.control.ki, 0.01);
        assert_eq!(scenario.plant.initial_c, 0.0);
        validate_scenario(&scenario).unwrap();
    }

    #[test]
    fn clamp_leaves_valid_scenario_alone() {
        let mut scenario = ScenarioDef::default();
        assert!(clamp_scenario(&mut scenario).is_empty());
        assert_eq!(scenario, ScenarioDef::default());
    }
}
