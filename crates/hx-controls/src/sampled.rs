//! Fixed-timestep scheduling for the simulation loop.
//!
//! The host calls in at its own cadence (animation frames, timer ticks). The
//! clock accumulates wall-clock time and releases at most one virtual step per
//! tick once a full step period has elapsed. There is no catch-up: a slow host
//! slows the simulation down instead of changing its dynamics.

use crate::error::{ControlError, ControlResult};

/// Virtual step size in seconds.
pub const DEFAULT_STEP_S: f64 = 0.1;

/// Stateless form of the stepping rule.
///
/// Returns 1 when at least `dt` seconds separate `now` from `last`, else 0.
pub fn steps_to_advance(now: f64, last: f64, dt: f64) -> u32 {
    if now - last >= dt { 1 } else { 0 }
}

/// Wall-clock driven stepper.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Step period in seconds.
    dt: f64,
    /// Wall time accumulated since the last released step.
    accumulated: f64,
    /// Wall time of the previous tick, `None` until the first one.
    last_tick: Option<f64>,
}

impl SimulationClock {
    /// Create a new clock.
    ///
    /// # Arguments
    ///
    /// * `dt` - Step period in seconds (must be positive)
    pub fn new(dt: f64) -> ControlResult<Self> {
        let dt = hx_core::ensure_positive(dt, "dt must be positive")?;
        Ok(Self {
            dt,
            accumulated: 0.0,
            last_tick: None,
        })
    }

    /// Create a clock from a step frequency in Hz.
    pub fn from_frequency(freq_hz: f64) -> ControlResult<Self> {
        if freq_hz.is_nan() || freq_hz <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "frequency must be positive",
            });
        }
        Self::new(1.0 / freq_hz)
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Feed an elapsed wall-clock interval and get the number of steps due.
    ///
    /// Returns 0 or 1. Releasing a step clears the accumulator entirely; any
    /// excess beyond `dt` is dropped.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        self.accumulated += elapsed.max(0.0);
        if self.accumulated >= self.dt {
            self.accumulated = 0.0;
            1
        } else {
            0
        }
    }

    /// Feed an absolute wall-clock reading (seconds).
    ///
    /// The first tick only records the baseline.
    pub fn tick(&mut self, now: f64) -> u32 {
        match self.last_tick.replace(now) {
            Some(last) => self.advance(now - last),
            None => 0,
        }
    }

    /// Forget the baseline and any accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_tick = None;
    }

    /// Wall time still needed before the next step is released.
    pub fn time_until_step(&self) -> f64 {
        (self.dt - self.accumulated).max(0.0)
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            dt: DEFAULT_STEP_S,
            accumulated: 0.0,
            last_tick: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_creation() {
        let clock = SimulationClock::new(0.1).unwrap();
        assert_eq!(clock.dt(), 0.1);
        assert_eq!(SimulationClock::default().dt(), DEFAULT_STEP_S);
    }

    #[test]
    fn clock_from_frequency() {
        let clock = SimulationClock::from_frequency(10.0).unwrap();
        assert!((clock.dt() - 0.1).abs() < 1e-10);
    }

    #[test]
    fn invalid_clock_params() {
        assert!(SimulationClock::new(0.0).is_err());
        assert!(SimulationClock::new(-0.1).is_err());
        assert!(SimulationClock::new(f64::NAN).is_err());
        assert!(SimulationClock::from_frequency(0.0).is_err());
    }

    #[test]
    fn half_period_deltas_release_one_step_per_period() {
        let mut clock = SimulationClock::new(0.1).unwrap();

        assert_eq!(clock.advance(0.05), 0);
        assert_eq!(clock.advance(0.05), 1);
        // Accumulator was cleared by the released step.
        assert_eq!(clock.advance(0.05), 0);
        assert_eq!(clock.advance(0.05), 1);
    }

    #[test]
    fn slow_host_gets_no_catch_up() {
        let mut clock = SimulationClock::new(0.1).unwrap();
        assert_eq!(clock.advance(1.0), 1);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn tick_uses_first_reading_as_baseline() {
        let mut clock = SimulationClock::new(0.1).unwrap();
        assert_eq!(clock.tick(100.0), 0);
        assert_eq!(clock.tick(100.05), 0);
        assert_eq!(clock.tick(100.2), 1);
        assert_eq!(clock.tick(100.21), 0);
    }

    #[test]
    fn reset_clears_baseline() {
        let mut clock = SimulationClock::new(0.1).unwrap();
        clock.tick(0.0);
        clock.tick(0.09);
        clock.reset();
        assert_eq!(clock.tick(5.0), 0);
        assert!((clock.time_until_step() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn time_until_step_counts_down() {
        let mut clock = SimulationClock::new(0.1).unwrap();
        clock.advance(0.04);
        assert!((clock.time_until_step() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn stateless_rule() {
        assert_eq!(steps_to_advance(1.05, 1.0, 0.1), 0);
        assert_eq!(steps_to_advance(1.1, 1.0, 0.1), 1);
        assert_eq!(steps_to_advance(3.0, 1.0, 0.1), 1);
    }
}
