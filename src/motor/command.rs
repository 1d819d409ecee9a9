//! Start command for one run.

use crate::motion::{Direction, RampParams};

/// Parameters of a `start_motor` call.
///
/// `direction` and `steps` fall back to the controller's current direction and
/// configured critical step count when left as `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCommand {
    /// Velocity delta per step.
    pub acceleration: f32,
    /// Start speed and ramp floor.
    pub start_speed: f32,
    /// Ramp ceiling.
    pub max_speed: f32,
    /// Direction of the run.
    pub direction: Option<Direction>,
    /// Steps requested.
    pub steps: Option<u32>,
}

impl MoveCommand {
    /// Command with the given ramp, keeping direction and step count defaults.
    pub const fn new(acceleration: f32, start_speed: f32, max_speed: f32) -> Self {
        Self {
            acceleration,
            start_speed,
            max_speed,
            direction: None,
            steps: None,
        }
    }

    /// Command built from ramp bounds.
    pub const fn from_ramp(params: RampParams) -> Self {
        Self::new(params.acceleration, params.min_velocity, params.max_velocity)
    }

    /// Run in `direction`.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Run for `steps` steps.
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Ramp bounds of this command.
    pub fn ramp(&self) -> RampParams {
        RampParams::new(self.acceleration, self.start_speed, self.max_speed)
    }
}
