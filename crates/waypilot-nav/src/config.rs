use serde::{Deserialize, Serialize};

use crate::geo::BearingWrap;
use crate::nav::Limits;
use crate::pid::PidConfig;
use crate::waypoint::{Waypoint, REFERENCE_WAYPOINTS};

/// Heading the steering loop holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeadingReference {
    /// Hold a constant compass heading regardless of where the target is.
    Fixed { deg: i32 },
    /// Steer toward the bearing of the active waypoint.
    Target,
}

impl Default for HeadingReference {
    fn default() -> Self {
        HeadingReference::Fixed { deg: 45 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceParams {
    pub arrival_radius_m: f64,
    /// Beyond this distance from home the route is abandoned.
    pub home_limit_m: f64,
    /// Neutral yaw actuator position.
    pub middle_yaw_trim: i32,
    pub launch_altitude_m: i32,
    pub speed_min: i32,
    pub speed_max: i32,
    pub heading_reference: HeadingReference,
    pub bearing_wrap: BearingWrap,
}

impl Default for GuidanceParams {
    fn default() -> Self {
        Self {
            arrival_radius_m: 30.0,
            home_limit_m: 4000.0,
            middle_yaw_trim: 90,
            launch_altitude_m: 0,
            speed_min: 45,
            speed_max: 100,
            heading_reference: HeadingReference::default(),
            bearing_wrap: BearingWrap::default(),
        }
    }
}

impl GuidanceParams {
    pub fn limits(&self) -> Limits {
        Limits { arrival_radius_m: self.arrival_radius_m, home_limit_m: self.home_limit_m }
    }
}

/// Runtime safety nets layered over the reference control law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Safeguards {
    /// Minimum PID `dt` in seconds, 0 disables.
    pub min_dt_s: f64,
    /// Keep the previous commands when the position is NaN or infinite.
    pub hold_on_non_finite: bool,
}

impl Default for Safeguards {
    fn default() -> Self {
        Self { min_dt_s: 0.001, hold_on_non_finite: true }
    }
}

impl Safeguards {
    /// Everything off: the bare control law, divide-by-zero and NaN included.
    pub fn reference() -> Self {
        Self { min_dt_s: 0.0, hold_on_non_finite: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub guidance: GuidanceParams,
    pub heading: PidConfig,
    pub altitude: PidConfig,
    pub safeguards: Safeguards,
    /// Entry 0 is home.
    pub waypoints: Vec<Waypoint>,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            guidance: GuidanceParams::default(),
            heading: PidConfig::heading(),
            altitude: PidConfig::altitude(),
            safeguards: Safeguards::default(),
            waypoints: REFERENCE_WAYPOINTS.to_vec(),
        }
    }
}
