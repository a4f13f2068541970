use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use waypilot_proto::FixedPoint;

use crate::clock::{Clock, MonotonicClock};
use crate::config::{GuidanceConfig, GuidanceParams, HeadingReference, Safeguards};
use crate::error::NavError;
use crate::geo;
use crate::pid::PidController;
use crate::waypoint::{Waypoint, WaypointTable, FIRST_LEG};

/// Engine shared with a multi-threaded host. Lock around the whole
/// set-compute-read sequence, not around individual calls.
pub type SharedEngine<C = MonotonicClock> = Arc<Mutex<GuidanceEngine<C>>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub arrival_radius_m: f64,
    pub home_limit_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranges {
    pub to_target_m: f64,
    pub to_home_m: f64,
}

/// Result of one waypoint-sequencing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub failsafe: bool,
    pub arrived: bool,
    /// Index after the failsafe check; its altitude is this cycle's target.
    pub steer_index: usize,
    /// Index the next cycle starts from.
    pub next_index: usize,
}

/// Waypoint sequencing, independent of sensors and controllers.
///
/// The failsafe is applied first and arrival second, so arriving at a route point
/// while outside the home limit moves on to waypoint 1. Arrival is judged against
/// the distance to the waypoint that was active at the start of the cycle.
pub fn transition(current: usize, last_index: usize, ranges: Ranges, limits: &Limits) -> Transition {
    let current = if current > last_index { 0 } else { current };

    let failsafe = ranges.to_home_m > limits.home_limit_m;
    let steer_index = if failsafe { 0 } else { current };

    let arrived = ranges.to_target_m < limits.arrival_radius_m;
    let next_index = match arrived {
        true if steer_index >= last_index => 0,
        true => steer_index + 1,
        false => steer_index,
    };

    Transition { failsafe, arrived, steer_index, next_index }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Computed(Transition),
    /// Inputs were unusable; outputs and navigation state are unchanged.
    Hold,
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingInput {
    lat: f64,
    lon: f64,
    alt_m: i32,
}

/// Snapshot of the navigation state for telemetry and status output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStatus {
    pub cycle: u64,
    pub waypoint: usize,
    pub wp_distance_m: f64,
    pub wp_bearing_deg: f64,
    pub speed: i32,
    pub angle: i32,
}

pub struct GuidanceEngine<C: Clock = MonotonicClock> {
    table: WaypointTable,
    params: GuidanceParams,
    safeguards: Safeguards,
    heading: PidController,
    altitude: PidController,
    clock: C,

    input: PendingInput,
    current_wp: usize,
    wp_distance: f64,
    wp_bearing: f64,

    speed: i32,
    angle: i32,
    cycles: u64,
}

impl GuidanceEngine<MonotonicClock> {
    pub fn new(cfg: &GuidanceConfig) -> Result<Self, NavError> {
        Self::with_clock(cfg, MonotonicClock::new())
    }
}

impl<C: Clock> GuidanceEngine<C> {
    pub fn with_clock(cfg: &GuidanceConfig, clock: C) -> Result<Self, NavError> {
        let table = WaypointTable::new(cfg.waypoints.clone())?;
        let min_dt = cfg.safeguards.min_dt_s;
        Ok(Self {
            table,
            params: cfg.guidance.clone(),
            safeguards: cfg.safeguards,
            heading: PidController::new(cfg.heading).with_dt_floor(min_dt),
            altitude: PidController::new(cfg.altitude).with_dt_floor(min_dt),
            clock,
            input: PendingInput::default(),
            current_wp: FIRST_LEG,
            wp_distance: 0.0,
            wp_bearing: 0.0,
            speed: 0,
            angle: cfg.guidance.middle_yaw_trim,
            cycles: 0,
        })
    }

    // ----- Inputs -----

    pub fn set_latitude(&mut self, lat: impl Into<FixedPoint>) {
        self.input.lat = lat.into().degrees();
    }

    pub fn set_longitude(&mut self, lon: impl Into<FixedPoint>) {
        self.input.lon = lon.into().degrees();
    }

    pub fn set_altitude(&mut self, alt_m: i32) {
        self.input.alt_m = alt_m;
    }

    /// Direct float path for in-process sensors, skipping the fixed-point boundary.
    pub fn set_position_degrees(&mut self, lat: f64, lon: f64, alt_m: i32) {
        self.input = PendingInput { lat, lon, alt_m };
    }

    // ----- Guidance step -----

    pub fn compute(&mut self) -> Outcome {
        let PendingInput { lat, lon, alt_m } = self.input;

        if self.safeguards.hold_on_non_finite && !(lat.is_finite() && lon.is_finite()) {
            warn!(lat, lon, "non-finite position, holding speed={} angle={}", self.speed, self.angle);
            return Outcome::Hold;
        }

        let now_ms = self.clock.now_ms();
        let target = *self.table.get(self.current_wp);

        // whole degrees, as the steering loop works on integer headings
        let bearing = geo::bearing(lat, lon, target.lat, target.lon, self.params.bearing_wrap).trunc();
        let distance = geo::distance(lat, lon, target.lat, target.lon);
        self.wp_bearing = bearing;
        self.wp_distance = distance;
        debug!(wp = self.current_wp, bearing, distance, "leg");

        let reference = match self.params.heading_reference {
            HeadingReference::Fixed { deg } => deg,
            HeadingReference::Target => bearing as i32,
        };
        let heading_error = geo::compass_error(reference, bearing as i32);
        let steer = self.heading.update(heading_error as f64, now_ms);
        let angle = (self.params.middle_yaw_trim as f64 + steer) as i32;

        let home = self.table.home();
        let ranges = Ranges {
            to_target_m: distance,
            to_home_m: geo::distance(lat, lon, home.lat, home.lon),
        };
        let step = transition(self.current_wp, self.table.last_index(), ranges, &self.params.limits());
        if step.failsafe {
            warn!(
                to_home_m = ranges.to_home_m,
                limit_m = self.params.home_limit_m,
                "beyond home limit, returning to waypoint 0"
            );
        }

        let target_alt = self.table.get(step.steer_index).alt_m;
        let climb = self.altitude.update_setpoint(
            target_alt as f64,
            alt_m.saturating_sub(self.params.launch_altitude_m) as f64,
            now_ms,
        );
        let speed = (climb as i32).max(self.params.speed_min).min(self.params.speed_max);

        if step.arrived {
            info!(wp = self.current_wp, distance, next = step.next_index, "waypoint reached");
        }

        self.current_wp = step.next_index;
        self.speed = speed;
        self.angle = angle;
        self.cycles += 1;

        debug!(lat, lon, alt_m, speed, angle, wp = self.current_wp, "commands");
        Outcome::Computed(step)
    }

    // ----- Outputs -----

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Yaw command including the trim.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Yaw command relative to the trim.
    pub fn angle_offset(&self) -> i32 {
        self.angle - self.params.middle_yaw_trim
    }

    pub fn current_waypoint(&self) -> usize {
        self.current_wp
    }

    pub fn active_waypoint(&self) -> &Waypoint {
        self.table.get(self.current_wp)
    }

    pub fn wp_distance(&self) -> f64 {
        self.wp_distance
    }

    pub fn wp_bearing(&self) -> f64 {
        self.wp_bearing
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn table(&self) -> &WaypointTable {
        &self.table
    }

    pub fn params(&self) -> &GuidanceParams {
        &self.params
    }

    pub fn heading_pid(&self) -> &PidController {
        &self.heading
    }

    pub fn altitude_pid(&self) -> &PidController {
        &self.altitude
    }

    pub fn snapshot(&self) -> NavStatus {
        NavStatus {
            cycle: self.cycles,
            waypoint: self.current_wp,
            wp_distance_m: self.wp_distance,
            wp_bearing_deg: self.wp_bearing,
            speed: self.speed,
            angle: self.angle,
        }
    }

    /// Jump to a waypoint; out-of-range indices go home.
    pub fn set_current_waypoint(&mut self, index: usize) {
        self.current_wp = if index > self.table.last_index() { 0 } else { index };
    }
}
