//! Fixed-step simulation of a PID-regulated first-order thermal plant.
//!
//! Provides:
//! - First-order plant model with explicit Euler integration
//! - `SimulationEngine` composing plant, PID, mode selection and clock
//! - Read-only `Snapshot`s for renderers and charts
//! - Headless runner with decimated chart recording

pub mod engine;
pub mod error;
pub mod plant;
pub mod sim;
pub mod state;

// Re-exports for public API
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
pub use hx_controls::Mode;
pub use plant::{PlantParameters, integrate};
pub use sim::{ChartSample, ChartSeries, SimOptions, SimRecord, run_sim};
pub use state::{ControlParameters, SimulationState, Snapshot};
