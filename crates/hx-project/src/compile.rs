//! Scenario to engine compilation.

use hx_core::units::{degc, delta_k, s};
use hx_sim::{ControlParameters, PlantParameters, SimOptions, SimulationEngine};

use crate::schema::{ControlDef, PlantDef, ScenarioDef};
use crate::validate::validate_scenario;
use crate::{ProjectError, ProjectResult};

pub fn plant_parameters(def: &PlantDef) -> ProjectResult<PlantParameters> {
    PlantParameters::from_quantities(
        s(def.tau_s),
        delta_k(def.gain_c),
        degc(def.ambient_c),
        degc(def.initial_c),
    )
    .map_err(|e| ProjectError::Compile {
        what: e.to_string(),
    })
}

pub fn control_parameters(def: &ControlDef) -> ControlParameters {
    ControlParameters {
        setpoint: def.setpoint_c,
        tolerance: def.tolerance_pct,
        kp: def.kp,
        ki: def.ki,
        kd: def.kd,
    }
}

/// Validate the scenario and build an engine in its reset state.
pub fn build_engine(scenario: &ScenarioDef) -> ProjectResult<SimulationEngine> {
    validate_scenario(scenario)?;
    let plant = plant_parameters(&scenario.plant)?;
    let control = control_parameters(&scenario.control);
    let engine = SimulationEngine::with_step(plant, control, scenario.simulation.dt_s)
        .map_err(|e| ProjectError::Compile {
            what: e.to_string(),
        })?;
    tracing::debug!(name = %scenario.name, "scenario compiled");
    Ok(engine)
}

/// Headless run options for `steps` steps with the scenario's chart decimation.
pub fn sim_options(scenario: &ScenarioDef, steps: u64) -> SimOptions {
    SimOptions {
        steps,
        record_every: scenario.simulation.record_every,
    }
}
