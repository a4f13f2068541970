use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct ActuatorStatus {
    pub last_speed: Option<i32>,
    pub last_angle: Option<i32>,
    pub commands: u64,
    pub last_command: Option<Instant>,
}

impl ActuatorStatus {
    pub fn command_age(&self) -> Option<Duration> {
        self.last_command.map(|t| t.elapsed())
    }

    pub(crate) fn record(&mut self) {
        self.commands += 1;
        self.last_command = Some(Instant::now());
    }
}
