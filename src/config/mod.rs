//! Configuration module for stepper-pwm.
//!
//! Provides the static per-motor bundle (ramp defaults, timer setup, direction
//! polarity) loaded once before the controllers are built, either from TOML
//! files (with `std` feature) or pre-parsed data.

mod motor;
mod system;
mod timer;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motor::MotorConfig;
pub use system::SystemConfig;
pub use timer::TimerConfig;
pub use validation::{validate_config, validate_motor};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
