//! First-order thermal plant.
//!
//! Dynamics: `dT/dt = -(T - T_amb)/tau + (K/tau) * u`
//!
//! `u` is the heating valve fraction in `[0, 1]`. For a constant `u` the
//! temperature relaxes exponentially toward `T_amb + K*u` with time constant
//! `tau`. Integration is explicit Euler on the fixed simulation step.

use hx_core::units::{Temperature, TempInterval, Time, as_degc, as_delta_k, as_s};
use hx_core::{HxResult, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// Plant parameters, fixed for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantParameters {
    /// Time constant tau (seconds), must be positive.
    pub time_constant: f64,
    /// Static gain K (°C per unit valve fraction).
    pub gain: f64,
    /// Ambient temperature (°C).
    pub ambient_temperature: f64,
    /// Temperature loaded into the plant on reset (°C).
    pub initial_temperature: f64,
}

impl Default for PlantParameters {
    fn default() -> Self {
        Self {
            time_constant: 30.0,
            gain: 100.0,
            ambient_temperature: 20.0,
            initial_temperature: 20.0,
        }
    }
}

impl PlantParameters {
    /// Build parameters from unit-carrying quantities.
    pub fn from_quantities(
        time_constant: Time,
        gain: TempInterval,
        ambient: Temperature,
        initial: Temperature,
    ) -> HxResult<Self> {
        Ok(Self {
            time_constant: ensure_positive(as_s(time_constant), "tau must be positive")?,
            gain: ensure_finite(as_delta_k(gain), "gain")?,
            ambient_temperature: ensure_finite(as_degc(ambient), "ambient temperature")?,
            initial_temperature: ensure_finite(as_degc(initial), "initial temperature")?,
        })
    }

    /// Temperature rate of change at `temperature` under valve fraction `u`.
    #[inline]
    pub fn dtdt(&self, temperature: f64, u: f64) -> f64 {
        -(temperature - self.ambient_temperature) / self.time_constant
            + (self.gain / self.time_constant) * u
    }

    /// Fixed point for a constant valve fraction: `T_amb + K*u`.
    pub fn equilibrium(&self, u: f64) -> f64 {
        self.ambient_temperature + self.gain * u
    }
}

/// Advance the plant temperature by one explicit Euler step.
///
/// Preconditions (not checked): `u` in `[0, 1]`, `dt > 0`, `tau > 0`, finite
/// inputs.
#[inline]
pub fn integrate(temperature: f64, u: f64, params: &PlantParameters, dt: f64) -> f64 {
    temperature + dt * params.dtdt(temperature, u)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn converges_monotonically_to_equilibrium(
            u in 0.0_f64..=1.0,
            t0 in -50.0_f64..200.0,
        ) {
            let params = PlantParameters::default();
            let target = params.equilibrium(u);
            let mut t = t0;
            let mut gap = (t - target).abs();
            for _ in 0..5_000 {
                let next = integrate(t, u, &params, 0.1);
                let next_gap = (next - target).abs();
                prop_assert!(next_gap <= gap + 1e-9);
                // Euler with dt < tau never overshoots the fixed point.
                prop_assert!((next - target) * (t0 - target) >= -1e-9);
                t = next;
                gap = next_gap;
            }
            prop_assert!(gap < 1e-3 * (1.0 + (t0 - target).abs()));
        }
    }
}
