//! Headless runs and chart series recording.

use serde::{Deserialize, Serialize};

use crate::engine::SimulationEngine;
use crate::error::{SimError, SimResult};
use crate::state::Snapshot;

/// Options for headless runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Number of fixed steps to take.
    pub steps: u64,
    /// Record every N-th step (decimation)
    pub record_every: u64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            steps: 1000,
            record_every: 10,
        }
    }
}

/// One point of the temperature/setpoint/error chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSample {
    pub time_s: f64,
    pub temperature: f64,
    pub setpoint: f64,
    pub error_pct: f64,
    pub actuation_pct: f64,
}

impl From<&Snapshot> for ChartSample {
    fn from(snap: &Snapshot) -> Self {
        Self {
            time_s: snap.time,
            temperature: snap.temperature,
            setpoint: snap.setpoint,
            error_pct: snap.error_percent(),
            actuation_pct: snap.actuation_percent,
        }
    }
}

/// Decimated chart series.
///
/// Keeps one sample for every `record_every`-th step. Observing the same step
/// twice (a host frame where no step was due) records nothing.
#[derive(Clone, Debug)]
pub struct ChartSeries {
    record_every: u64,
    last_step: Option<u64>,
    samples: Vec<ChartSample>,
}

impl ChartSeries {
    pub fn new(record_every: u64) -> SimResult<Self> {
        if record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(Self {
            record_every,
            last_step: None,
            samples: Vec::new(),
        })
    }

    /// Offer a snapshot. Returns `true` if it was recorded.
    pub fn observe(&mut self, snap: &Snapshot) -> bool {
        if self.last_step == Some(snap.step_count) {
            return false;
        }
        self.last_step = Some(snap.step_count);
        if snap.step_count % self.record_every != 0 {
            return false;
        }
        self.samples.push(ChartSample::from(snap));
        true
    }

    /// Drop all samples, e.g. after an engine reset.
    pub fn clear(&mut self) {
        self.last_step = None;
        self.samples.clear();
    }

    pub fn samples(&self) -> &[ChartSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Result of a headless run.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Decimated chart series, including the starting point.
    pub series: ChartSeries,
    /// State after the last step.
    pub final_state: Snapshot,
}

/// Advance `engine` by `opts.steps` fixed steps from its current state.
///
/// Steps unconditionally; the run/pause gate only applies to `tick`.
pub fn run_sim(engine: &mut SimulationEngine, opts: &SimOptions) -> SimResult<SimRecord> {
    if opts.steps == 0 {
        return Err(SimError::InvalidArg {
            what: "steps must be positive",
        });
    }

    let mut series = ChartSeries::new(opts.record_every)?;
    let mut snap = engine.snapshot();
    series.observe(&snap);

    for _ in 0..opts.steps {
        snap = engine.step();
        series.observe(&snap);
    }

    tracing::debug!(
        steps = opts.steps,
        samples = series.len(),
        final_temperature = snap.temperature,
        "headless run complete"
    );

    Ok(SimRecord {
        series,
        final_state: snap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.steps, 1000);
        assert_eq!(opts.record_every, 10);
    }

    #[test]
    fn sim_options_invalid() {
        let mut engine = SimulationEngine::default();
        let zero_steps = SimOptions {
            steps: 0,
            record_every: 1,
        };
        assert!(run_sim(&mut engine, &zero_steps).is_err());

        let zero_decimation = SimOptions {
            steps: 10,
            record_every: 0,
        };
        assert!(run_sim(&mut engine, &zero_decimation).is_err());
    }

    #[test]
    fn records_every_nth_step_plus_start() {
        let mut engine = SimulationEngine::default();
        let opts = SimOptions {
            steps: 100,
            record_every: 10,
        };
        let record = run_sim(&mut engine, &opts).unwrap();
        // steps 0, 10, ..., 100
        assert_eq!(record.series.len(), 11);
        assert_eq!(record.final_state.step_count, 100);
        assert_eq!(record.series.samples()[0].time_s, 0.0);
    }

    #[test]
    fn repeated_snapshot_is_not_recorded_twice() {
        let engine = SimulationEngine::default();
        let mut series = ChartSeries::new(1).unwrap();
        let snap = engine.snapshot();
        assert!(series.observe(&snap));
        assert!(!series.observe(&snap));
        assert_eq!(series.len(), 1);

        series.clear();
        assert!(series.is_empty());
        assert!(series.observe(&snap));
    }
}
