//! Time-based PID controller with anti-windup.
//!
//! Each instance keeps its own error history and timer, and is re-entered once per
//! guidance cycle with the current millisecond clock reading.

use serde::{Deserialize, Serialize};

/// Closed interval used for integral and output clamping.
///
/// Bounds may be given in either order; they are sorted on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Band {
    lo: f64,
    hi: f64,
}

impl Band {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo && v <= self.hi
    }

    /// NaN passes through untouched.
    pub fn clamp(&self, v: f64) -> f64 {
        if v < self.lo {
            self.lo
        } else if v > self.hi {
            self.hi
        } else {
            v
        }
    }
}

impl From<[f64; 2]> for Band {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Band> for [f64; 2] {
    fn from(b: Band) -> Self {
        [b.lo, b.hi]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub integral_band: Band,
    pub output_band: Band,
    /// Negate the output (steering convention).
    #[serde(default)]
    pub reverse: bool,
}

impl PidConfig {
    pub fn heading() -> Self {
        Self {
            kp: 10.0,
            ki: 0.01,
            kd: 0.001,
            integral_band: Band::new(-15.0, 15.0),
            output_band: Band::new(-15.0, 15.0),
            reverse: true,
        }
    }

    pub fn altitude() -> Self {
        Self {
            kp: 4.0,
            ki: 0.001,
            kd: 2.0,
            // given high-then-low; Band sorts it to [-20, 20]
            integral_band: Band::new(20.0, -20.0),
            output_band: Band::new(-45.0, 40.0),
            reverse: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PidController {
    cfg: PidConfig,
    min_dt_s: f64,

    previous_error: f64,
    integral: f64,
    last_update_ms: u64,
}

impl PidController {
    pub fn new(cfg: PidConfig) -> Self {
        Self { cfg, min_dt_s: 0.0, previous_error: 0.0, integral: 0.0, last_update_ms: 0 }
    }

    /// Lower bound on `dt` in seconds. Zero disables the floor, letting two updates in
    /// the same millisecond divide by zero in the derivative term.
    pub fn with_dt_floor(mut self, min_dt_s: f64) -> Self {
        self.min_dt_s = min_dt_s.max(0.0);
        self
    }

    pub fn config(&self) -> &PidConfig {
        &self.cfg
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    pub fn last_update_ms(&self) -> u64 {
        self.last_update_ms
    }

    pub fn reset(&mut self) {
        self.previous_error = 0.0;
        self.integral = 0.0;
        self.last_update_ms = 0;
    }

    /// Run one step on a precomputed error.
    ///
    /// `dt` is measured from the previous update. The timer starts at zero, so the
    /// first call sees the whole clock reading as its interval.
    pub fn update(&mut self, error: f64, now_ms: u64) -> f64 {
        let mut dt = now_ms.saturating_sub(self.last_update_ms) as f64 / 1000.0;
        if self.min_dt_s > 0.0 && dt < self.min_dt_s {
            dt = self.min_dt_s;
        }

        self.integral = self.cfg.integral_band.clamp(self.integral + error * dt);
        let derivative = (error - self.previous_error) / dt;

        let raw = self.cfg.kp * error + self.cfg.ki * self.integral + self.cfg.kd * derivative;
        let out = self.cfg.output_band.clamp(raw);

        self.previous_error = error;
        self.last_update_ms = now_ms;

        if self.cfg.reverse {
            -out
        } else {
            out
        }
    }

    pub fn update_setpoint(&mut self, set_point: f64, current: f64, now_ms: u64) -> f64 {
        self.update(set_point - current, now_ms)
    }
}
