use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::trace;
use waypilot_proto::FixedPoint;

/// One position sample in the form it crosses the sensor boundary.
#[derive(Debug, Clone)]
pub struct PositionFix {
    pub lat: FixedPoint,
    pub lon: FixedPoint,
    pub alt_m: i32,
    pub ts: OffsetDateTime,
}

pub trait PositionSource {
    fn sample(&mut self) -> PositionFix;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub start_lat: f64,
    pub start_lon: f64,
    pub alt_m: i32,
    /// Distance covered per nudge, in degrees.
    pub step_deg: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { start_lat: 2.5, start_lon: 1.4, alt_m: 3, step_deg: 0.0001 }
    }
}

/// Simulated GPS. It does not fly on its own: the dispatcher nudges it along the
/// current bearing after each guidance cycle.
#[derive(Debug, Clone)]
pub struct SimGps {
    lat: f64,
    lon: f64,
    alt_m: i32,
    step_deg: f64,
}

impl SimGps {
    pub fn new(cfg: &SimConfig) -> Self {
        Self { lat: cfg.start_lat, lon: cfg.start_lon, alt_m: cfg.alt_m, step_deg: cfg.step_deg }
    }

    pub fn position(&self) -> (f64, f64, i32) {
        (self.lat, self.lon, self.alt_m)
    }

    pub fn set_altitude(&mut self, alt_m: i32) {
        self.alt_m = alt_m;
    }

    /// Move one step along a compass bearing in degrees.
    pub fn nudge(&mut self, bearing_deg: f64) {
        let b = bearing_deg.to_radians();
        self.lat += b.cos() * self.step_deg;
        self.lon += b.sin() * self.step_deg;
    }
}

impl PositionSource for SimGps {
    fn sample(&mut self) -> PositionFix {
        let fix = PositionFix {
            lat: FixedPoint::from_degrees(self.lat),
            lon: FixedPoint::from_degrees(self.lon),
            alt_m: self.alt_m,
            ts: OffsetDateTime::now_utc(),
        };
        trace!(lat = self.lat, lon = self.lon, lat_e6 = fix.lat.raw(), lon_e6 = fix.lon.raw(), "sim gps sample");
        fix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn samples_are_encoded() {
        let mut gps = SimGps::new(&SimConfig::default());
        let fix = gps.sample();
        assert_eq!(fix.lat, FixedPoint(2_500_000));
        assert_eq!(fix.lon, FixedPoint(1_400_000));
        assert_eq!(fix.alt_m, 3);
    }

    #[test]
    fn nudge_follows_bearing() {
        let cfg = SimConfig { start_lat: 0.0, start_lon: 0.0, alt_m: 0, step_deg: 0.001 };
        let mut gps = SimGps::new(&cfg);
        gps.nudge(90.0);
        let (lat, lon, _) = gps.position();
        assert_relative_eq!(lat, 0.0, epsilon = 1e-12);
        assert_relative_eq!(lon, 0.001, epsilon = 1e-12);

        // 360 from the legacy fold still means north
        gps.nudge(360.0);
        let (lat, _, _) = gps.position();
        assert_relative_eq!(lat, 0.001, epsilon = 1e-12);
    }
}
