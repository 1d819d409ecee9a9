//! GPIO module for stepper-pwm.
//!
//! Register-level port access and a capability-typed pin wrapper.

mod pin;
mod port;

pub use pin::{CanRead, CanWrite, Input, InputOutput, Level, Output, Pin, Readable, Writable};
pub use port::GpioPort;
