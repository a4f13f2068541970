//! Fixed-point transport for coordinates.
//!
//! Some boundaries only carry integers, so a coordinate in degrees is scaled by
//! [`SCALE`] and truncated toward zero. No rounding is applied: the truncation bias is
//! part of the wire contract and peers rely on getting the exact same integers.

use serde::{Deserialize, Serialize};

/// Scale factor between degrees and the encoded integer (micro-degrees).
pub const SCALE: f64 = 1_000_000.0;

/// Encode degrees as a scaled integer, truncating toward zero.
///
/// Values beyond roughly ±2147 degrees do not fit; the cast saturates there.
pub fn encode(value: f64) -> i32 {
    (value * SCALE) as i32
}

/// Decode a scaled integer back into degrees.
pub fn decode(value: i32) -> f64 {
    value as f64 / SCALE
}

/// A coordinate in encoded micro-degree form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedPoint(pub i32);

impl FixedPoint {
    pub fn from_degrees(deg: f64) -> Self {
        Self(encode(deg))
    }

    pub fn degrees(self) -> f64 {
        decode(self.0)
    }

    pub fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for FixedPoint {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<FixedPoint> for i32 {
    fn from(fp: FixedPoint) -> Self {
        fp.0
    }
}
