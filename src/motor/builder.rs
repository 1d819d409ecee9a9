//! Builder pattern for StepperController.

use embedded_hal::digital::OutputPin;

use crate::config::{MotorConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::motion::RampParams;
use crate::timer::{timer_dividend, PwmTimer};

use super::controller::{ControllerSettings, StepperController};
use super::correction::{AppCorrection, NoCorrection};

/// Builder for creating StepperController instances.
pub struct StepperControllerBuilder<STEP, DIR, EN, AUX, TIM, COR = NoCorrection> {
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    enable_pin: Option<EN>,
    aux_pin: Option<AUX>,
    timer: Option<TIM>,
    correction: COR,
    name: Option<heapless::String<32>>,
    channel: u8,
    timer_dividend: Option<u32>,
    timer_clock: Option<(u32, u32)>,
    direction_inverted: bool,
    critical_steps: u32,
    defaults: Option<RampParams>,
}

impl<STEP, DIR, EN, AUX, TIM> Default for StepperControllerBuilder<STEP, DIR, EN, AUX, TIM> {
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, EN, AUX, TIM> StepperControllerBuilder<STEP, DIR, EN, AUX, TIM> {
    /// Create a new builder without a correction hook.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            enable_pin: None,
            aux_pin: None,
            timer: None,
            correction: NoCorrection,
            name: None,
            channel: 1,
            timer_dividend: None,
            timer_clock: None,
            direction_inverted: false,
            critical_steps: 0,
            defaults: None,
        }
    }
}

impl<STEP, DIR, EN, AUX, TIM, COR> StepperControllerBuilder<STEP, DIR, EN, AUX, TIM, COR> {
    /// Set the STEP pin (timer output).
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the driver enable pin (active low).
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set the current winding / auxiliary pin.
    pub fn aux_pin(mut self, pin: AUX) -> Self {
        self.aux_pin = Some(pin);
        self
    }

    /// Set the timer channel driver.
    pub fn timer(mut self, timer: TIM) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = heapless::String::try_from(name).ok();
        self
    }

    /// Set the PWM channel (1-6).
    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Set the timer tick rate directly.
    pub fn timer_dividend(mut self, dividend: u32) -> Self {
        self.timer_dividend = Some(dividend);
        self
    }

    /// Derive the timer tick rate from its input clock and prescaler.
    pub fn timer_clock(mut self, clock_hz: u32, prescaler: u32) -> Self {
        self.timer_clock = Some((clock_hz, prescaler));
        self
    }

    /// Set direction inversion.
    pub fn direction_inverted(mut self, inverted: bool) -> Self {
        self.direction_inverted = inverted;
        self
    }

    /// Set the step count used when a command does not give one.
    pub fn critical_steps(mut self, steps: u32) -> Self {
        self.critical_steps = steps;
        self
    }

    /// Set the default ramp bounds.
    pub fn defaults(mut self, params: RampParams) -> Self {
        self.defaults = Some(params);
        self
    }

    /// Install a per-tick correction hook.
    pub fn correction<C>(self, correction: C) -> StepperControllerBuilder<STEP, DIR, EN, AUX, TIM, C>
    where
        C: AppCorrection,
    {
        StepperControllerBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            enable_pin: self.enable_pin,
            aux_pin: self.aux_pin,
            timer: self.timer,
            correction,
            name: self.name,
            channel: self.channel,
            timer_dividend: self.timer_dividend,
            timer_clock: self.timer_clock,
            direction_inverted: self.direction_inverted,
            critical_steps: self.critical_steps,
            defaults: self.defaults,
        }
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.name = Some(config.name.clone());
        self.direction_inverted = config.direction_inverted;
        self.critical_steps = config.critical_steps;
        self.defaults = Some(config.ramp());
        self.channel = config.timer.channel;
        self.timer_clock = Some((config.timer.clock_hz, config.timer.prescaler));
        self.timer_dividend = None;
        self
    }

    /// Configure from SystemConfig by motor name.
    pub fn from_config(self, config: &SystemConfig, motor_name: &str) -> Result<Self> {
        let motor_config = config.motor(motor_name).ok_or_else(|| {
            Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(motor_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_motor_config(motor_config))
    }

    fn resolve_dividend(&self) -> Result<u32> {
        if let Some(dividend) = self.timer_dividend {
            return if dividend > 0 {
                Ok(dividend)
            } else {
                Err(Error::Config(ConfigError::InvalidTimerClock {
                    clock_hz: 0,
                    prescaler: 1,
                }))
            };
        }

        let (clock_hz, prescaler) = self
            .timer_clock
            .ok_or(Error::Config(ConfigError::MissingField("timer clock")))?;

        if prescaler == 0 {
            return Err(Error::Config(ConfigError::InvalidPrescaler(prescaler)));
        }

        timer_dividend(clock_hz, prescaler)
            .ok_or(Error::Config(ConfigError::InvalidTimerClock { clock_hz, prescaler }))
    }
}

impl<STEP, DIR, EN, AUX, TIM, COR> StepperControllerBuilder<STEP, DIR, EN, AUX, TIM, COR>
where
    DIR: OutputPin,
    EN: OutputPin,
    AUX: OutputPin,
    TIM: PwmTimer,
    COR: AppCorrection,
{
    /// Build the StepperController.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin, the timer, the ramp defaults or the timer
    /// clock are missing or invalid.
    pub fn build(self) -> Result<StepperController<STEP, DIR, EN, AUX, TIM, COR>> {
        let timer_dividend = self.resolve_dividend()?;

        if !(1..=6).contains(&self.channel) {
            return Err(Error::Config(ConfigError::InvalidChannel(self.channel)));
        }

        let defaults = self
            .defaults
            .ok_or(Error::Config(ConfigError::MissingField("ramp defaults")))?;
        defaults
            .validate()
            .map_err(|e| Error::Config(ConfigError::InvalidRamp(e)))?;

        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let enable_pin = self
            .enable_pin
            .ok_or(Error::Config(ConfigError::MissingField("enable_pin")))?;
        let aux_pin = self
            .aux_pin
            .ok_or(Error::Config(ConfigError::MissingField("aux_pin")))?;
        let timer = self
            .timer
            .ok_or(Error::Config(ConfigError::MissingField("timer")))?;

        let name = self
            .name
            .unwrap_or_else(|| heapless::String::try_from("motor").unwrap_or_default());

        Ok(StepperController::new(
            step_pin,
            dir_pin,
            enable_pin,
            aux_pin,
            timer,
            self.correction,
            ControllerSettings {
                name,
                channel: self.channel,
                timer_dividend,
                direction_inverted: self.direction_inverted,
                critical_steps: self.critical_steps,
                defaults,
            },
        ))
    }
}
