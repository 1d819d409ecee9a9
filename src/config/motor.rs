//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::motion::RampParams;

use super::timer::TimerConfig;

/// Static configuration of one stepper channel.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Swap the DIR pin polarity.
    #[serde(default)]
    pub direction_inverted: bool,

    /// Default velocity delta per step.
    pub acceleration: f32,

    /// Default start speed and ramp floor.
    pub min_velocity: f32,

    /// Default ramp ceiling.
    pub max_velocity: f32,

    /// Step count used when a start command does not give one.
    pub critical_steps: u32,

    /// Step timer setup.
    pub timer: TimerConfig,
}

impl MotorConfig {
    /// Default ramp bounds.
    pub fn ramp(&self) -> RampParams {
        RampParams::new(self.acceleration, self.min_velocity, self.max_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_defaults() {
        let config = MotorConfig {
            name: String::try_from("feeder").unwrap(),
            direction_inverted: false,
            acceleration: 2.0,
            min_velocity: 100.0,
            max_velocity: 800.0,
            critical_steps: 4000,
            timer: TimerConfig {
                clock_hz: 170_000_000,
                prescaler: 170,
                channel: 1,
            },
        };

        assert_eq!(config.ramp(), RampParams::new(2.0, 100.0, 800.0));
        assert_eq!(config.timer.dividend(), Some(1_000_000));
    }
}
