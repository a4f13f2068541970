use serde::{Deserialize, Serialize};

use crate::error::NavError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    pub alt_m: i32,
}

impl Waypoint {
    pub const fn new(lat: f64, lon: f64, alt_m: i32) -> Self {
        Self { lat, lon, alt_m }
    }
}

/// Index of the first route leg after home.
pub const FIRST_LEG: usize = 1;

/// Reference table. Home is left at the zero origin, entries 1..=6 are the patrol loop.
pub const REFERENCE_WAYPOINTS: [Waypoint; 7] = [
    Waypoint::new(0.0, 0.0, 0),
    Waypoint::new(34.982613, -118.443357, 50),
    Waypoint::new(34.025136, -118.445254, 100),
    Waypoint::new(34.018287, -118.456048, 100),
    Waypoint::new(34.009332, -118.467672, 50),
    Waypoint::new(34.006476, -118.465413, 50),
    Waypoint::new(34.009927, -118.458320, 20),
];

/// Immutable ordered table: entry 0 is home, `1..=last_index()` is the route.
#[derive(Debug, Clone)]
pub struct WaypointTable {
    points: Vec<Waypoint>,
}

impl WaypointTable {
    pub fn new(points: Vec<Waypoint>) -> Result<Self, NavError> {
        if points.len() < 2 {
            return Err(NavError::RouteTooShort(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !(p.lat.is_finite() && p.lon.is_finite())) {
            return Err(NavError::NonFiniteWaypoint { index });
        }
        Ok(Self { points })
    }

    pub fn reference() -> Self {
        Self { points: REFERENCE_WAYPOINTS.to_vec() }
    }

    pub fn home(&self) -> &Waypoint {
        &self.points[0]
    }

    /// Waypoint at `index`, falling back to home for anything out of range.
    pub fn get(&self, index: usize) -> &Waypoint {
        self.points.get(index).unwrap_or(&self.points[0])
    }

    /// N, the highest valid index.
    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.points.iter()
    }
}
