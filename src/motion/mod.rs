//! Motion module for stepper-pwm.
//!
//! Provides the per-step acceleration ramp driven from the timer interrupt.

mod ramp;

pub use ramp::{Direction, Mode, MotorEvent, Ramp, RampParams};
