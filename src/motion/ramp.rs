//! Per-step trapezoidal ramp.
//!
//! The ramp is advanced once per timer period, i.e. once per step. Velocity
//! climbs by a fixed delta per step, holds at the ceiling, and falls back by
//! the same delta. `accel_step` counts the steps spent climbing so that the
//! fall uses exactly as many.

use crate::error::MotionError;
use crate::io::Level;

/// Direction of rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Reverse rotation.
    Backward,
    /// Forward rotation.
    #[default]
    Forward,
}

impl Direction {
    /// The other direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// DIR pin level for this direction, before any inversion.
    #[inline]
    pub fn level(self) -> Level {
        match self {
            Direction::Forward => Level::High,
            Direction::Backward => Level::Low,
        }
    }
}

/// Ramp mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Not running; refresh does nothing.
    #[default]
    Idle,
    /// Velocity rising toward the ceiling.
    Accelerating,
    /// Holding the ceiling.
    Constant,
    /// Velocity falling toward the floor.
    Decelerating,
    /// Halted by a supervisor; refresh does nothing.
    Error,
}

impl Mode {
    /// Whether a tick advances the ramp in this mode.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Mode::Accelerating | Mode::Constant | Mode::Decelerating)
    }
}

/// Last ramp transition signal. Stays until overwritten or cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorEvent {
    /// Nothing reported yet.
    #[default]
    None,
    /// The motor was stopped.
    Stop,
    /// The ceiling velocity was reached.
    ConstantSpeedReached,
    /// Reserved for the end of the constant phase; the ramp does not emit it.
    ConstantSpeedEnd,
}

/// Acceleration and velocity bounds for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampParams {
    /// Velocity delta per step.
    pub acceleration: f32,
    /// Start speed and ramp floor.
    pub min_velocity: f32,
    /// Ramp ceiling.
    pub max_velocity: f32,
}

impl RampParams {
    /// Create ramp parameters.
    pub const fn new(acceleration: f32, min_velocity: f32, max_velocity: f32) -> Self {
        Self {
            acceleration,
            min_velocity,
            max_velocity,
        }
    }

    /// Check the bounds can form a ramp.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.acceleration.is_finite() || self.acceleration <= 0.0 {
            return Err(MotionError::InvalidAcceleration(self.acceleration));
        }

        let range_ok = self.min_velocity.is_finite()
            && self.max_velocity.is_finite()
            && self.min_velocity > 0.0
            && self.max_velocity >= self.min_velocity;
        if !range_ok {
            return Err(MotionError::InvalidVelocityRange {
                min: self.min_velocity,
                max: self.max_velocity,
            });
        }

        Ok(())
    }
}

/// Ramp state of one motor.
///
/// Owned by a controller. Outside the crate it is read through accessors; a
/// correction hook may also override the velocity or halt updates with
/// [`Ramp::enter_error`].
#[derive(Debug, Clone)]
pub struct Ramp {
    mode: Mode,
    velocity: f32,
    acceleration: f32,
    min_velocity: f32,
    max_velocity: f32,
    steps_to_go: u32,
    current_step: u32,
    accel_step: u32,
    event: MotorEvent,
}

impl Ramp {
    /// Idle ramp with the given bounds. Velocity starts at zero.
    pub(crate) fn new(params: RampParams) -> Self {
        Self {
            mode: Mode::Idle,
            velocity: 0.0,
            acceleration: params.acceleration,
            min_velocity: params.min_velocity,
            max_velocity: params.max_velocity,
            steps_to_go: 0,
            current_step: 0,
            accel_step: 0,
            event: MotorEvent::None,
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Commanded velocity.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Velocity delta per step.
    #[inline]
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Ramp floor.
    #[inline]
    pub fn min_velocity(&self) -> f32 {
        self.min_velocity
    }

    /// Ramp ceiling.
    #[inline]
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    /// Steps requested for this run.
    #[inline]
    pub fn steps_to_go(&self) -> u32 {
        self.steps_to_go
    }

    /// Steps executed in this run.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Acceleration credit still to be spent decelerating.
    #[inline]
    pub fn accel_step(&self) -> u32 {
        self.accel_step
    }

    /// Last transition signal.
    #[inline]
    pub fn event(&self) -> MotorEvent {
        self.event
    }

    /// Reset the last event to `MotorEvent::None`.
    pub fn clear_event(&mut self) {
        self.event = MotorEvent::None;
    }

    /// Override the velocity, clamped to the ramp bounds.
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity.max(self.min_velocity).min(self.max_velocity);
    }

    /// Stop ramp updates until the next start.
    pub fn enter_error(&mut self) {
        self.mode = Mode::Error;
    }

    /// Load new bounds and drop the velocity to the floor.
    pub(crate) fn configure(&mut self, params: RampParams) {
        self.acceleration = params.acceleration;
        self.min_velocity = params.min_velocity;
        self.max_velocity = params.max_velocity;
        self.velocity = params.min_velocity;
    }

    /// Start a run of `steps` steps from the current velocity.
    pub(crate) fn begin(&mut self, steps: u32) {
        self.accel_step = 0;
        self.current_step = 0;
        self.steps_to_go = steps;
        self.mode = Mode::Accelerating;
    }

    /// Drop back to the floor and start climbing again, keeping `steps_to_go`.
    pub(crate) fn restart(&mut self) {
        self.velocity = self.min_velocity;
        self.current_step = 0;
        self.accel_step = 0;
        self.mode = Mode::Accelerating;
    }

    /// Force `Idle` and report `MotorEvent::Stop`.
    pub(crate) fn halt(&mut self) {
        self.mode = Mode::Idle;
        self.event = MotorEvent::Stop;
    }

    /// Advance the ramp by one step.
    pub(crate) fn advance(&mut self) {
        match self.mode {
            Mode::Idle | Mode::Error => return,
            Mode::Accelerating => {
                self.velocity = (self.velocity + self.acceleration).min(self.max_velocity);
                if self.accel_step >= self.climb_limit() {
                    // This tick still climbs but earns no credit.
                    self.mode = Mode::Decelerating;
                    #[cfg(feature = "defmt")]
                    defmt::trace!("ramp: half-way cap at step {}", self.current_step);
                } else {
                    self.accel_step += 1;
                    if self.velocity >= self.max_velocity {
                        self.event = MotorEvent::ConstantSpeedReached;
                        self.mode = Mode::Constant;
                        #[cfg(feature = "defmt")]
                        defmt::trace!("ramp: ceiling reached at step {}", self.current_step);
                    }
                }
            }
            Mode::Constant => {
                if self.current_step.saturating_add(self.accel_step) >= self.steps_to_go {
                    self.mode = Mode::Decelerating;
                    #[cfg(feature = "defmt")]
                    defmt::trace!("ramp: decelerating at step {}", self.current_step);
                    self.decelerate();
                }
            }
            Mode::Decelerating => self.decelerate(),
        }

        self.current_step = self.current_step.saturating_add(1);
    }

    /// Credit at which climbing stops. Counting the uncredited cap tick, at
    /// most half the run climbs and the fall still fits before `steps_to_go`.
    fn climb_limit(&self) -> u32 {
        self.steps_to_go.saturating_sub(1) / 2
    }

    fn decelerate(&mut self) {
        if self.accel_step > 0 {
            self.velocity = (self.velocity - self.acceleration).max(self.min_velocity);
            self.accel_step -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(params: RampParams, steps: u32) -> Ramp {
        let mut ramp = Ramp::new(params);
        ramp.configure(params);
        ramp.begin(steps);
        ramp
    }

    #[test]
    fn test_reference_run() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);
        let mut velocities = [0.0f32; 24];

        for v in velocities.iter_mut() {
            ramp.advance();
            *v = ramp.velocity();
        }

        assert_eq!(
            velocities,
            [
                11.0, 12.0, 13.0, 14.0, 15.0, // climb
                15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.0, // hold
                14.0, 13.0, 12.0, 11.0, 10.0, // fall
                10.0, 10.0, 10.0, 10.0, // coast
            ]
        );
        assert_eq!(ramp.mode(), Mode::Decelerating);
        assert_eq!(ramp.accel_step(), 0);
        assert_eq!(ramp.current_step(), 24);
        assert_eq!(ramp.event(), MotorEvent::ConstantSpeedReached);
    }

    #[test]
    fn test_constant_entered_when_ceiling_hit() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);

        for _ in 0..4 {
            ramp.advance();
            assert_eq!(ramp.mode(), Mode::Accelerating);
        }
        ramp.advance();
        assert_eq!(ramp.mode(), Mode::Constant);
        assert_eq!(ramp.accel_step(), 5);
    }

    #[test]
    fn test_ceiling_clamped_on_uneven_delta() {
        let mut ramp = started(RampParams::new(3.0, 10.0, 15.0), 100);

        ramp.advance();
        assert_eq!(ramp.velocity(), 13.0);
        ramp.advance();
        assert_eq!(ramp.velocity(), 15.0);
        assert_eq!(ramp.mode(), Mode::Constant);
    }

    #[test]
    fn test_short_run_caps_acceleration_at_half() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 1000.0), 6);

        ramp.advance();
        ramp.advance();
        assert_eq!(ramp.mode(), Mode::Accelerating);
        assert_eq!(ramp.accel_step(), 2);
        assert_eq!(ramp.velocity(), 12.0);

        // Cap tick: velocity still rises, no credit is added.
        ramp.advance();
        assert_eq!(ramp.mode(), Mode::Decelerating);
        assert_eq!(ramp.accel_step(), 2);
        assert_eq!(ramp.velocity(), 13.0);

        ramp.advance();
        assert_eq!(ramp.velocity(), 12.0);
        ramp.advance();
        assert_eq!(ramp.velocity(), 11.0);
        assert_eq!(ramp.accel_step(), 0);
        assert_eq!(ramp.current_step(), 5);

        ramp.advance();
        assert_eq!(ramp.velocity(), 11.0);
        assert_eq!(ramp.current_step(), 6);
        assert_eq!(ramp.event(), MotorEvent::None);
    }

    #[test]
    fn test_odd_run_uses_every_step() {
        let mut ramp = started(RampParams::new(2.0, 10.0, 1000.0), 7);
        let mut velocities = [0.0f32; 7];

        for v in velocities.iter_mut() {
            ramp.advance();
            *v = ramp.velocity();
        }

        assert_eq!(velocities, [12.0, 14.0, 16.0, 18.0, 16.0, 14.0, 12.0]);
        assert_eq!(ramp.accel_step(), 0);
    }

    #[test]
    fn test_single_step_run() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 1);

        ramp.advance();
        assert_eq!(ramp.mode(), Mode::Decelerating);
        assert_eq!(ramp.velocity(), 11.0);
        assert_eq!(ramp.accel_step(), 0);
    }

    #[test]
    fn test_idle_and_error_do_not_advance() {
        let mut ramp = Ramp::new(RampParams::new(1.0, 10.0, 15.0));
        ramp.advance();
        assert_eq!(ramp.current_step(), 0);
        assert_eq!(ramp.mode(), Mode::Idle);

        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);
        ramp.advance();
        ramp.enter_error();
        ramp.advance();
        assert_eq!(ramp.current_step(), 1);
        assert_eq!(ramp.velocity(), 11.0);
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);
        for _ in 0..7 {
            ramp.advance();
        }

        ramp.restart();
        assert_eq!(ramp.mode(), Mode::Accelerating);
        assert_eq!(ramp.velocity(), 10.0);
        assert_eq!(ramp.current_step(), 0);
        assert_eq!(ramp.accel_step(), 0);
        assert_eq!(ramp.steps_to_go(), 20);

        let mut idle = Ramp::new(RampParams::new(1.0, 10.0, 15.0));
        idle.configure(RampParams::new(1.0, 10.0, 15.0));
        idle.restart();
        assert_eq!(idle.mode(), Mode::Accelerating);
        assert_eq!(idle.velocity(), 10.0);
    }

    #[test]
    fn test_set_velocity_clamps() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);
        ramp.set_velocity(100.0);
        assert_eq!(ramp.velocity(), 15.0);
        ramp.set_velocity(1.0);
        assert_eq!(ramp.velocity(), 10.0);
    }

    #[test]
    fn test_halt_reports_stop() {
        let mut ramp = started(RampParams::new(1.0, 10.0, 15.0), 20);
        ramp.halt();
        assert_eq!(ramp.mode(), Mode::Idle);
        assert_eq!(ramp.event(), MotorEvent::Stop);
        ramp.clear_event();
        assert_eq!(ramp.event(), MotorEvent::None);
    }

    #[test]
    fn test_params_validation() {
        assert!(RampParams::new(1.0, 10.0, 15.0).validate().is_ok());
        assert!(RampParams::new(1.0, 10.0, 10.0).validate().is_ok());
        assert_eq!(
            RampParams::new(0.0, 10.0, 15.0).validate(),
            Err(MotionError::InvalidAcceleration(0.0))
        );
        assert!(RampParams::new(f32::NAN, 10.0, 15.0).validate().is_err());
        assert!(RampParams::new(1.0, 0.0, 15.0).validate().is_err());
        assert!(RampParams::new(1.0, 20.0, 15.0).validate().is_err());
    }

    #[test]
    fn test_direction_levels() {
        assert_eq!(Direction::Forward.level(), Level::High);
        assert_eq!(Direction::Backward.level(), Level::Low);
        assert_eq!(Direction::Forward.opposite(), Direction::Backward);
    }
}
