//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks every motor with [`validate_motor`].
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, motor) in config.motors.iter() {
        validate_motor(motor)?;
    }

    Ok(())
}

/// Validate one motor configuration.
///
/// Checks:
/// - Ramp defaults form a ramp (positive acceleration, `0 < min <= max`)
/// - Prescaler is non-zero and leaves a non-zero tick rate
/// - Timer channel is 1-6
pub fn validate_motor(config: &MotorConfig) -> Result<()> {
    config
        .ramp()
        .validate()
        .map_err(|e| Error::Config(ConfigError::InvalidRamp(e)))?;

    let timer = &config.timer;
    if timer.prescaler == 0 {
        return Err(Error::Config(ConfigError::InvalidPrescaler(timer.prescaler)));
    }

    if timer.dividend().is_none() {
        return Err(Error::Config(ConfigError::InvalidTimerClock {
            clock_hz: timer.clock_hz,
            prescaler: timer.prescaler,
        }));
    }

    if !(1..=6).contains(&timer.channel) {
        return Err(Error::Config(ConfigError::InvalidChannel(timer.channel)));
    }

    Ok(())
}
