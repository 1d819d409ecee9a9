//! Timer configuration from TOML.

use serde::Deserialize;

/// Hardware timer feeding the step output.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerConfig {
    /// Timer input clock in Hz.
    pub clock_hz: u32,

    /// Prescaler divide ratio.
    pub prescaler: u32,

    /// PWM channel carrying the step signal (1-based).
    #[serde(default = "default_channel")]
    pub channel: u8,
}

fn default_channel() -> u8 {
    1
}

impl TimerConfig {
    /// Timer ticks per second after the prescaler, if usable.
    pub fn dividend(&self) -> Option<u32> {
        crate::timer::timer_dividend(self.clock_hz, self.prescaler)
    }
}
