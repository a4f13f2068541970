pub mod actuators;
pub mod state;

use anyhow::Result;
use serde::Deserialize;

pub use actuators::LogActuators;
pub use state::ActuatorStatus;

/// Effectors driven by the guidance loop.
pub trait Actuators {
    /// Throttle command, already clamped to the speed band.
    fn throttle(&mut self, speed: i32) -> Result<()>;

    /// Yaw/steering command, trim included.
    fn yaw(&mut self, angle: i32) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Log every command at info level. When false only changes are logged.
    pub log_every_command: bool,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self { log_every_command: true }
    }
}
