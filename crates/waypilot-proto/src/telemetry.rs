use serde::{Deserialize, Serialize};

use crate::codec::FixedPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Status,
    Arrival,
    Failsafe,
    Hold,
}

/// One guidance cycle as seen from outside the loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceFrame {
    pub ts_unix_ms: i64,
    pub cycle: u64,
    pub kind: FrameKind,
    // Position, as fed to the engine
    pub lat: FixedPoint,
    pub lon: FixedPoint,
    pub alt_m: i32,
    // Navigation
    pub waypoint: usize,
    pub wp_distance_m: f64,
    pub wp_bearing_deg: f64,
    // Commands
    pub speed: i32,
    pub angle: i32,
}
