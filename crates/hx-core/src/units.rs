// hx-core/src/units.rs

use uom::si::f64::{
    TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn degc(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn delta_k(v: f64) -> TempInterval {
    use uom::si::temperature_interval::kelvin;
    TempInterval::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Celsius reading of an absolute temperature.
#[inline]
pub fn as_degc(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[inline]
pub fn as_delta_k(dt: TempInterval) -> f64 {
    use uom::si::temperature_interval::kelvin;
    dt.get::<kelvin>()
}

#[inline]
pub fn as_s(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn celsius_round_trip_through_kelvin() {
        assert!(close(as_degc(degc(20.0)), 20.0));
        assert!(close(degc(20.0).get::<uom::si::thermodynamic_temperature::kelvin>(), 293.15));
        assert!(close(as_delta_k(delta_k(100.0)), 100.0));
        assert!(close(as_s(s(30.0)), 30.0));
    }
}
