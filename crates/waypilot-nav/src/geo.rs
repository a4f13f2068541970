//! Short-range geodesy on a flat-earth (equirectangular) approximation.
//!
//! Good enough for waypoints a few kilometres apart at mid latitudes. Precision
//! degrades toward the poles and over long legs.

use serde::{Deserialize, Serialize};

/// Statute miles per degree of latitude.
pub const MILES_PER_DEGREE: f64 = 69.1;
pub const METERS_PER_MILE: f64 = 1609.344;
/// Coarse degrees-per-radian used for the longitude correction.
pub const DEG_PER_RAD_APPROX: f64 = 57.3;

/// How a raw `atan2` bearing is folded into a compass heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingWrap {
    /// Anything at or below 1 degree gets 360 added, so results land in `(1, 361]`.
    #[default]
    Legacy,
    /// Negative bearings get 360 added, results land in `[0, 360)`.
    Strict,
}

// Scaled (north, east) deltas in miles.
fn deltas(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let x = MILES_PER_DEGREE * (lat2 - lat1);
    let y = MILES_PER_DEGREE * (lon2 - lon1) * (lat1 / DEG_PER_RAD_APPROX).cos();
    (x, y)
}

/// Distance in metres from point 1 to point 2.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (x, y) = deltas(lat1, lon1, lat2, lon2);
    (x * x + y * y).sqrt() * METERS_PER_MILE
}

/// Compass bearing in degrees from point 1 toward point 2.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64, wrap: BearingWrap) -> f64 {
    let (x, y) = deltas(lat1, lon1, lat2, lon2);
    let deg = y.atan2(x).to_degrees();
    match wrap {
        BearingWrap::Legacy if deg <= 1.0 => deg + 360.0,
        BearingWrap::Strict if deg < 0.0 => deg + 360.0,
        _ => deg,
    }
}

/// Signed heading error from `current` to `set_point`, folded into `[-180, 180]`.
pub fn compass_error(set_point: i32, current: i32) -> i32 {
    let diff = set_point - current;
    if diff.abs() > 180 {
        if diff < -180 {
            diff + 360
        } else {
            diff - 360
        }
    } else {
        diff
    }
}
