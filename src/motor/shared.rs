//! Sharing a controller between main-line code and its timer interrupt.
//!
//! Both sides go through [`SharedController::with`], which runs inside a
//! critical section, so the interrupt never observes a half-applied
//! `start_motor`, `stop_motor` or `change_direction`.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

use crate::timer::PwmTimer;

use super::controller::StepperController;
use super::correction::AppCorrection;

/// Interrupt-safe slot holding one controller.
///
/// ```rust,ignore
/// static MOTOR: SharedController<Motor> = SharedController::new();
///
/// #[interrupt]
/// fn TIM1_CC() {
///     MOTOR.on_compare_elapsed();
/// }
///
/// // main
/// MOTOR.install(motor);
/// MOTOR.with(|m| m.start_default());
/// ```
pub struct SharedController<C> {
    inner: Mutex<RefCell<Option<C>>>,
}

impl<C> SharedController<C> {
    /// Empty slot.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Put a controller in the slot, returning the previous one.
    pub fn install(&self, controller: C) -> Option<C> {
        critical_section::with(|cs| self.inner.borrow(cs).replace(Some(controller)))
    }

    /// Run `f` on the controller inside a critical section.
    ///
    /// Returns `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().as_mut().map(f))
    }

    /// Remove the controller from the slot.
    pub fn take(&self) -> Option<C> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }
}

impl<C> Default for SharedController<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, EN, AUX, TIM, COR> SharedController<StepperController<STEP, DIR, EN, AUX, TIM, COR>>
where
    DIR: OutputPin,
    EN: OutputPin,
    AUX: OutputPin,
    TIM: PwmTimer,
    COR: AppCorrection,
{
    /// Timer compare interrupt body.
    pub fn on_compare_elapsed(&self) {
        self.with(|motor| motor.motor_refresh());
    }
}
