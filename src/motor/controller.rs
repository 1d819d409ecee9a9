//! Timer-driven stepper controller.
//!
//! Generic over embedded-hal 1.0 output pins and a [`PwmTimer`]. The timer
//! produces the step pulses; the controller only rewrites its period once per
//! step from the compare interrupt.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};
use crate::io::Level;
use crate::motion::{Direction, Mode, MotorEvent, Ramp, RampParams};
use crate::timer::{PwmTimer, TimerRegisters};

use super::command::MoveCommand;
use super::correction::{AppCorrection, NoCorrection};

/// Static settings resolved by the builder.
#[derive(Debug, Clone)]
pub(crate) struct ControllerSettings {
    pub name: heapless::String<32>,
    pub channel: u8,
    pub timer_dividend: u32,
    pub direction_inverted: bool,
    pub critical_steps: u32,
    pub defaults: RampParams,
}

/// Stepper controller driving one timer PWM channel.
///
/// Generic over:
/// - `STEP`: step pin, owned but driven by the timer in alternate function mode
/// - `DIR`: direction pin (must implement `OutputPin`)
/// - `EN`: active-low driver enable pin (must implement `OutputPin`)
/// - `AUX`: current winding / auxiliary pin (must implement `OutputPin`)
/// - `TIM`: timer channel (must implement `PwmTimer`)
/// - `COR`: per-tick correction hook (defaults to `NoCorrection`)
pub struct StepperController<STEP, DIR, EN, AUX, TIM, COR = NoCorrection>
where
    DIR: OutputPin,
    EN: OutputPin,
    AUX: OutputPin,
    TIM: PwmTimer,
    COR: AppCorrection,
{
    step_pin: STEP,
    dir_pin: DIR,
    enable_pin: EN,
    aux_pin: AUX,
    timer: TIM,
    correction: COR,

    /// Timer ticks per second, i.e. clock / prescaler.
    timer_dividend: u32,
    channel: u8,
    direction_inverted: bool,

    /// Steps used when a command does not give a count.
    critical_steps: u32,
    defaults: RampParams,

    ramp: Ramp,
    direction: Direction,
    moving: bool,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,
}

impl<STEP, DIR, EN, AUX, TIM, COR> StepperController<STEP, DIR, EN, AUX, TIM, COR>
where
    DIR: OutputPin,
    EN: OutputPin,
    AUX: OutputPin,
    TIM: PwmTimer,
    COR: AppCorrection,
{
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: EN,
        aux_pin: AUX,
        timer: TIM,
        correction: COR,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            aux_pin,
            timer,
            correction,
            timer_dividend: settings.timer_dividend,
            channel: settings.channel,
            direction_inverted: settings.direction_inverted,
            critical_steps: settings.critical_steps,
            defaults: settings.defaults,
            ramp: Ramp::new(settings.defaults),
            direction: Direction::default(),
            moving: false,
            name: settings.name,
        }
    }

    /// Compare-elapsed interrupt entry point.
    ///
    /// Runs the correction hook, advances the ramp by one step and reprograms
    /// the timer. Does nothing while `Idle` or `Error`.
    pub fn motor_refresh(&mut self) {
        if !self.ramp.mode().is_running() {
            return;
        }

        self.correction.apply(&mut self.ramp);
        self.ramp.advance();
        self.update_registers();
    }

    /// Start a new run, stopping the current one first.
    ///
    /// # Errors
    ///
    /// Returns an error if the ramp bounds are invalid (nothing is touched in
    /// that case) or a pin write fails.
    pub fn start_motor(&mut self, command: MoveCommand) -> Result<()> {
        let params = command.ramp();
        params.validate()?;

        if self.moving {
            self.stop_motor()?;
        }

        self.ramp.configure(params);
        self.set_direction(command.direction.unwrap_or(self.direction))?;

        let steps = command.steps.unwrap_or(self.critical_steps);
        self.enable_pin.set_low().map_err(|_| MotorError::PinError)?;

        self.ramp.begin(steps);
        self.moving = true;
        self.update_registers();
        self.timer.start_pwm_interrupt(self.channel);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{}: start {} steps {} at {}..{}",
            self.name.as_str(),
            steps,
            self.direction,
            params.min_velocity,
            params.max_velocity
        );

        Ok(())
    }

    /// Start a run with the configured ramp, step count and current direction.
    pub fn start_default(&mut self) -> Result<()> {
        self.start_motor(self.default_move())
    }

    /// Stop the timer and disable the driver. No-op when not moving.
    ///
    /// # Errors
    ///
    /// Returns an error if the enable pin write fails. The motor is logically
    /// stopped either way.
    pub fn stop_motor(&mut self) -> Result<()> {
        if !self.moving {
            return Ok(());
        }

        self.timer.stop_pwm_interrupt(self.channel);
        self.moving = false;
        self.ramp.halt();

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: stop at step {}", self.name.as_str(), self.ramp.current_step());

        self.enable_pin.set_high().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    /// Reverse immediately and restart the ramp from the floor.
    ///
    /// Works in every mode: counters reset, velocity drops to the floor, the
    /// mode becomes `Accelerating` and the registers are rewritten. The timer
    /// is neither started nor stopped.
    pub fn change_direction(&mut self) -> Result<()> {
        self.set_direction(self.direction.opposite())?;
        self.ramp.restart();
        self.update_registers();

        #[cfg(feature = "defmt")]
        defmt::debug!("{}: direction now {}", self.name.as_str(), self.direction);

        Ok(())
    }

    /// Halt ramp updates. The timer keeps its last period until stopped.
    pub fn enter_error(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("{}: ramp halted in error", self.name.as_str());

        self.ramp.enter_error();
    }

    /// Reset the last event to `MotorEvent::None`.
    pub fn clear_event(&mut self) {
        self.ramp.clear_event();
    }

    /// Drive the current winding / auxiliary pin.
    pub fn set_current_level(&mut self, level: Level) -> Result<()> {
        let written = match level {
            Level::High => self.aux_pin.set_high(),
            Level::Low => self.aux_pin.set_low(),
        };
        written.map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    /// Command built from the configured defaults.
    pub fn default_move(&self) -> MoveCommand {
        MoveCommand::from_ramp(self.defaults)
    }

    /// Whether a run is in progress.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Current ramp mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.ramp.mode()
    }

    /// Last ramp event.
    #[inline]
    pub fn event(&self) -> MotorEvent {
        self.ramp.event()
    }

    /// Current direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Commanded velocity.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.ramp.velocity()
    }

    /// Steps executed in this run.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.ramp.current_step()
    }

    /// Remaining acceleration credit.
    #[inline]
    pub fn accel_step(&self) -> u32 {
        self.ramp.accel_step()
    }

    /// Steps requested for this run.
    #[inline]
    pub fn steps_to_go(&self) -> u32 {
        self.ramp.steps_to_go()
    }

    /// Full ramp state.
    #[inline]
    pub fn ramp(&self) -> &Ramp {
        &self.ramp
    }

    /// Timer ticks per second.
    #[inline]
    pub fn timer_dividend(&self) -> u32 {
        self.timer_dividend
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Correction hook.
    #[inline]
    pub fn correction(&self) -> &COR {
        &self.correction
    }

    /// Give back the owned hardware.
    pub fn release(self) -> (STEP, DIR, EN, AUX, TIM) {
        (
            self.step_pin,
            self.dir_pin,
            self.enable_pin,
            self.aux_pin,
            self.timer,
        )
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let level = if self.direction_inverted {
            !direction.level()
        } else {
            direction.level()
        };

        let written = match level {
            Level::High => self.dir_pin.set_high(),
            Level::Low => self.dir_pin.set_low(),
        };
        written.map_err(|_| MotorError::PinError)?;

        self.direction = direction;
        Ok(())
    }

    fn update_registers(&mut self) {
        if let Some(regs) = TimerRegisters::from_velocity(self.timer_dividend, self.ramp.velocity()) {
            regs.apply(&mut self.timer, self.channel);
        }
    }
}
