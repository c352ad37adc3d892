//! Control primitives for the heat exchanger loop.
//!
//! The control side of the simulation is split into small, independently
//! testable pieces:
//! - **PID controller**: parallel-form PID with output clamping to a valve fraction
//! - **Settling detector**: percent-error predicate plus a first-entry latch
//! - **Mode controller**: Automatic/Manual selection of the actuation source
//! - **Simulation clock**: fixed-timestep stepper driven by wall-clock ticks
//!
//! None of these own the plant state. The engine in `hx-sim` composes them.

pub mod controller;
pub mod error;
pub mod mode;
pub mod sampled;
pub mod settling;

pub use controller::{PIDController, PIDControllerState, PidOutput};
pub use error::{ControlError, ControlResult};
pub use mode::{Mode, ModeController};
pub use sampled::{DEFAULT_STEP_S, SimulationClock, steps_to_advance};
pub use settling::{check_settled, percent_error};
