//! # stepper-pwm
//!
//! Timer-driven stepper motor control with a per-step trapezoidal ramp and
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Hardware pulse generation**: a timer PWM channel produces the step
//!   signal; the compare interrupt reprograms its period once per step
//! - **Trapezoidal ramp**: linear climb, hold, and a fall that spends exactly
//!   the steps spent climbing
//! - **Typed pins**: read/write capability of a GPIO line checked at compile time
//! - **Interrupt safety**: controllers shared with their ISR through a
//!   critical-section mutex
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_pwm::{MoveCommand, StepperControllerBuilder, SystemConfig};
//!
//! let config: SystemConfig = stepper_pwm::load_config("board.toml")?;
//!
//! let mut motor = StepperControllerBuilder::new()
//!     .from_config(&config, "feeder")?
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .enable_pin(enable_pin)
//!     .aux_pin(current_pin)
//!     .timer(tim1_ch1)
//!     .build()?;
//!
//! motor.start_motor(MoveCommand::new(1.0, 200.0, 2000.0).steps(8000))?;
//!
//! // From the timer compare interrupt:
//! motor.motor_refresh();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod io;
pub mod motion;
pub mod motor;
pub mod timer;

// Re-exports for ergonomic API
pub use config::{validate_config, MotorConfig, SystemConfig, TimerConfig};
pub use error::{Error, Result};
pub use io::{GpioPort, Level, Pin, Readable, Writable};
pub use motion::{Direction, Mode, MotorEvent, Ramp, RampParams};
pub use motor::{
    AppCorrection, MoveCommand, NoCorrection, SharedController, StepperController,
    StepperControllerBuilder,
};
pub use timer::{PwmTimer, TimerRegisters};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
