use anyhow::Result;
use tracing::{debug, info};

use crate::state::ActuatorStatus;
use crate::{ActuatorConfig, Actuators};

/// Stand-in effectors: commands are logged and remembered, nothing moves.
#[derive(Debug, Default)]
pub struct LogActuators {
    cfg: ActuatorConfig,
    status: ActuatorStatus,
}

impl LogActuators {
    pub fn new(cfg: ActuatorConfig) -> Self {
        Self { cfg, status: ActuatorStatus::default() }
    }

    pub fn status(&self) -> &ActuatorStatus {
        &self.status
    }
}

impl Actuators for LogActuators {
    fn throttle(&mut self, speed: i32) -> Result<()> {
        let changed = self.status.last_speed != Some(speed);
        if self.cfg.log_every_command || changed {
            info!("throttle: speed={}", speed);
        } else {
            debug!("throttle: speed={} (unchanged)", speed);
        }
        self.status.last_speed = Some(speed);
        self.status.record();
        Ok(())
    }

    fn yaw(&mut self, angle: i32) -> Result<()> {
        let changed = self.status.last_angle != Some(angle);
        if self.cfg.log_every_command || changed {
            info!("yaw: angle={}", angle);
        } else {
            debug!("yaw: angle={} (unchanged)", angle);
        }
        self.status.last_angle = Some(angle);
        self.status.record();
        Ok(())
    }
}
