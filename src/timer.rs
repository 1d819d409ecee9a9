//! Timer/PWM port and the velocity to register mapping.

use libm::floorf;

/// PWM channel of a hardware timer with a compare-match interrupt.
///
/// The step pin is toggled by the timer itself; the driver only reprograms
/// the period and compare registers and starts or stops the output.
pub trait PwmTimer {
    /// Write the auto-reload (period) register.
    fn set_auto_reload(&mut self, value: u16);

    /// Write the compare register of `channel`.
    fn set_compare(&mut self, channel: u8, value: u16);

    /// Start PWM output on `channel` with its compare interrupt enabled.
    fn start_pwm_interrupt(&mut self, channel: u8);

    /// Stop PWM output on `channel` and mask its interrupt.
    fn stop_pwm_interrupt(&mut self, channel: u8);
}

impl<T: PwmTimer + ?Sized> PwmTimer for &mut T {
    #[inline]
    fn set_auto_reload(&mut self, value: u16) {
        (**self).set_auto_reload(value)
    }

    #[inline]
    fn set_compare(&mut self, channel: u8, value: u16) {
        (**self).set_compare(channel, value)
    }

    #[inline]
    fn start_pwm_interrupt(&mut self, channel: u8) {
        (**self).start_pwm_interrupt(channel)
    }

    #[inline]
    fn stop_pwm_interrupt(&mut self, channel: u8) {
        (**self).stop_pwm_interrupt(channel)
    }
}

/// Timer tick rate: input clock divided by the prescaler.
///
/// Returns `None` when the prescaler is zero or the result would be zero.
pub fn timer_dividend(clock_hz: u32, prescaler: u32) -> Option<u32> {
    clock_hz.checked_div(prescaler).filter(|d| *d > 0)
}

/// Register values for one pulse period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerRegisters {
    /// Auto-reload value (period in timer ticks).
    pub auto_reload: u16,
    /// Compare value (50% duty).
    pub compare: u16,
}

impl TimerRegisters {
    /// Map a velocity onto the 16-bit period/compare pair.
    ///
    /// `period = timer_dividend / floor(velocity)`. Returns `None` when the
    /// velocity is not positive, floors to zero, or the period falls outside
    /// `1..=65535`; callers then keep whatever the timer was running with.
    pub fn from_velocity(timer_dividend: u32, velocity: f32) -> Option<Self> {
        if velocity.is_nan() || velocity <= 0.0 {
            return None;
        }

        // Saturating cast, NaN was rejected above.
        let whole = floorf(velocity) as u32;
        let period = timer_dividend.checked_div(whole)?;
        let auto_reload = u16::try_from(period).ok().filter(|p| *p > 0)?;

        Some(Self {
            auto_reload,
            compare: auto_reload / 2,
        })
    }

    /// Program these values into `timer`.
    pub fn apply<T: PwmTimer>(self, timer: &mut T, channel: u8) {
        timer.set_auto_reload(self.auto_reload);
        timer.set_compare(channel, self.compare);
    }
}
