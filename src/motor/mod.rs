//! Motor module for stepper-pwm.
//!
//! Provides the timer-driven controller, its builder, the correction hook and
//! the interrupt-safe wrapper.

mod builder;
mod command;
mod controller;
mod correction;
mod shared;

pub use builder::StepperControllerBuilder;
pub use command::MoveCommand;
pub use controller::StepperController;
pub use correction::{AppCorrection, NoCorrection};
pub use shared::SharedController;
