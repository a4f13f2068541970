pub mod codec;
pub mod telemetry;

pub use codec::{decode, encode, FixedPoint, SCALE};
