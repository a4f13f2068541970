pub mod clock;
pub mod config;
pub mod doctor;
pub mod error;
pub mod geo;
pub mod gnss;
pub mod nav;
pub mod pid;
pub mod waypoint;

pub use config::{GuidanceConfig, GuidanceParams, HeadingReference, Safeguards};
pub use error::NavError;
pub use nav::{GuidanceEngine, Outcome, SharedEngine};
