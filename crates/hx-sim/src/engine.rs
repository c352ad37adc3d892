//! Simulation engine: plant, controller, mode and clock composed into one loop.
//!
//! The engine owns every mutable piece of the simulation. Hosts drive it with
//! `tick` (wall-clock cadence) or `step` (one virtual step), issue commands
//! between calls and read `Snapshot` values back. A snapshot always describes
//! a completed step.

use hx_controls::{Mode, ModeController, PIDControllerState, SimulationClock, check_settled};

use crate::error::SimResult;
use crate::plant::{self, PlantParameters};
use crate::state::{ControlParameters, SimulationState, Snapshot};

#[derive(Clone, Debug)]
pub struct SimulationEngine {
    plant: PlantParameters,
    control: ControlParameters,
    dt: f64,
    state: SimulationState,
    memory: PIDControllerState,
    modes: ModeController,
    running: bool,
    /// Operator valve opening, 0 to 100.
    manual_percent: f64,
    clock: SimulationClock,
}

impl SimulationEngine {
    /// Engine on the default 0.1 s step, in Manual mode and paused.
    pub fn new(plant: PlantParameters, control: ControlParameters) -> Self {
        Self::from_clock(plant, control, SimulationClock::default())
    }

    /// Engine with a custom step size.
    pub fn with_step(
        plant: PlantParameters,
        control: ControlParameters,
        dt: f64,
    ) -> SimResult<Self> {
        let clock = SimulationClock::new(dt)?;
        Ok(Self::from_clock(plant, control, clock))
    }

    fn from_clock(
        plant: PlantParameters,
        control: ControlParameters,
        clock: SimulationClock,
    ) -> Self {
        Self {
            plant,
            control,
            dt: clock.dt(),
            state: SimulationState::initial(plant.initial_temperature),
            memory: PIDControllerState::default(),
            modes: ModeController::new(),
            running: false,
            manual_percent: 0.0,
            clock,
        }
    }

    /// Reinitialize everything for a fresh run.
    ///
    /// Time, step count, settling latch, controller memory and valve go to
    /// zero; the plant is reloaded at its initial temperature; the mode returns
    /// to `Manual` and the loop is paused.
    pub fn reset(&mut self, plant: PlantParameters, control: ControlParameters) -> Snapshot {
        self.plant = plant;
        self.control = control;
        self.state = SimulationState::initial(plant.initial_temperature);
        self.memory = PIDControllerState::default();
        self.modes.reset();
        self.running = false;
        self.manual_percent = 0.0;
        self.clock.reset();
        tracing::debug!(
            initial_temperature = plant.initial_temperature,
            setpoint = control.setpoint,
            "simulation reset"
        );
        self.snapshot()
    }

    /// Advance one virtual step unconditionally.
    pub fn step(&mut self) -> Snapshot {
        let temperature = self.state.temperature;
        let automatic = self.modes.mode() == Mode::Automatic;

        let actuation = if automatic {
            let pid = self.control.controller();
            let (memory, output) =
                pid.update(&self.memory, temperature, self.control.setpoint, self.dt);
            self.memory = memory;
            output.actuation
        } else {
            self.manual_percent / 100.0
        };

        let next_temperature = plant::integrate(temperature, actuation, &self.plant, self.dt);
        let time = self.state.time + self.dt;

        // Settling is judged on the error that drove this step, stamped with
        // the time at the end of it. Manual steps leave the latch alone.
        let settling_time = if automatic {
            check_settled(
                self.control.setpoint,
                temperature,
                self.control.tolerance,
                self.state.settling_time,
                time,
            )
        } else {
            self.state.settling_time
        };
        if let (None, Some(t)) = (self.state.settling_time, settling_time) {
            tracing::info!(settling_time = t, "within tolerance");
        }

        self.state = SimulationState {
            temperature: next_temperature,
            time,
            step_count: self.state.step_count + 1,
            actuation_fraction: actuation,
            settling_time,
        };
        self.snapshot()
    }

    /// Host tick with a wall-clock reading in seconds.
    ///
    /// Steps at most once, and only when the mode allows stepping (running, or
    /// Manual) and a full step period has elapsed.
    pub fn tick(&mut self, now: f64) -> Snapshot {
        if self.modes.should_step(self.running) && self.clock.tick(now) > 0 {
            return self.step();
        }
        self.snapshot()
    }

    pub fn set_mode(&mut self, mode: Mode) -> Mode {
        self.modes.set_mode(mode)
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.modes.toggle()
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            tracing::debug!(running, "run state change");
        }
        self.running = running;
    }

    pub fn toggle_running(&mut self) -> bool {
        self.set_running(!self.running);
        self.running
    }

    /// Operator valve opening (0 to 100), used while in Manual mode.
    ///
    /// The range is the caller's responsibility. The value is held until
    /// changed.
    pub fn set_manual_actuation(&mut self, percent: f64) {
        self.manual_percent = percent;
    }

    /// Replace the loop parameters; effective from the next step.
    pub fn set_control_parameters(&mut self, control: ControlParameters) {
        tracing::debug!(
            setpoint = control.setpoint,
            tolerance = control.tolerance,
            kp = control.kp,
            ki = control.ki,
            kd = control.kd,
            "control parameters updated"
        );
        self.control = control;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            temperature: self.state.temperature,
            setpoint: self.control.setpoint,
            time: self.state.time,
            step_count: self.state.step_count,
            actuation_percent: self.state.actuation_fraction * 100.0,
            mode: self.modes.mode(),
            display_mode: self.modes.display_mode(self.running),
            running: self.running,
            settling_time: self.state.settling_time,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn controller_memory(&self) -> &PIDControllerState {
        &self.memory
    }

    pub fn plant(&self) -> &PlantParameters {
        &self.plant
    }

    pub fn control(&self) -> &ControlParameters {
        &self.control
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn manual_actuation(&self) -> f64 {
        self.manual_percent
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(PlantParameters::default(), ControlParameters::default())
    }
}
