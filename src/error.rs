//! Error types for stepper-pwm.
//!
//! The interrupt path never fails. Errors only come out of configuration,
//! controller construction, and main-line calls that drive GPIO.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-pwm operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor (pin / hardware) error
    Motor(MotorError),
    /// Invalid ramp parameters
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Motor name not found in configuration
    MotorNotFound(heapless::String<32>),
    /// Builder was missing a required part
    MissingField(&'static str),
    /// Timer prescaler must be non-zero
    InvalidPrescaler(u32),
    /// Timer clock divided by the prescaler must be non-zero
    InvalidTimerClock {
        /// Timer input clock in Hz
        clock_hz: u32,
        /// Prescaler divide ratio
        prescaler: u32,
    },
    /// Timer channel out of range (1-6)
    InvalidChannel(u8),
    /// Ramp defaults are invalid
    InvalidRamp(MotionError),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

/// Ramp parameter errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Acceleration must be finite and positive
    InvalidAcceleration(f32),
    /// Start speed must be positive and not above the maximum speed
    InvalidVelocityRange {
        /// Ramp floor (start speed)
        min: f32,
        /// Ramp ceiling
        max: f32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::MotorNotFound(name) => write!(f, "Motor '{}' not found", name),
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            ConfigError::InvalidPrescaler(v) => write!(f, "Invalid prescaler: {}. Must be > 0", v),
            ConfigError::InvalidTimerClock { clock_hz, prescaler } => {
                write!(f, "Timer clock {} Hz / prescaler {} leaves no usable tick rate", clock_hz, prescaler)
            }
            ConfigError::InvalidChannel(ch) => write!(f, "Invalid timer channel: {}. Must be 1-6", ch),
            ConfigError::InvalidRamp(e) => write!(f, "Invalid ramp defaults: {}", e),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidAcceleration(a) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", a)
            }
            MotionError::InvalidVelocityRange { min, max } => {
                write!(f, "Invalid velocity range: start {} must be > 0 and <= max {}", min, max)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
