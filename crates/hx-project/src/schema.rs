//! Scenario file schema.
//!
//! Every section and field has a default, so a scenario file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub plant: PlantDef,
    #[serde(default)]
    pub control: ControlDef,
    #[serde(default)]
    pub simulation: SimulationDef,
}

impl Default for ScenarioDef {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: default_name(),
            plant: PlantDef::default(),
            control: ControlDef::default(),
            simulation: SimulationDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlantDef {
    pub tau_s: f64,
    /// Static gain, °C per unit valve fraction.
    pub gain_c: f64,
    pub ambient_c: f64,
    pub initial_c: f64,
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            tau_s: 30.0,
            gain_c: 100.0,
            ambient_c: 20.0,
            initial_c: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlDef {
    pub setpoint_c: f64,
    pub tolerance_pct: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for ControlDef {
    fn default() -> Self {
        Self {
            setpoint_c: 50.0,
            tolerance_pct: 2.0,
            kp: 1.0,
            ki: 0.05,
            kd: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub dt_s: f64,
    /// Chart decimation: one sample every N steps.
    pub record_every: u64,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            dt_s: 0.1,
            record_every: 10,
        }
    }
}

fn default_version() -> u32 {
    LATEST_VERSION
}

fn default_name() -> String {
    "Heat exchanger".to_string()
}
