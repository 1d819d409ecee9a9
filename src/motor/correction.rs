//! Per-tick correction hook.

use crate::motion::Ramp;

/// Application hook run on every tick before the ramp advances.
///
/// Boards use it for physical compensation, e.g. trimming velocity against a
/// load estimate. It may adjust the velocity through [`Ramp::set_velocity`]
/// or halt updates with [`Ramp::enter_error`]. It runs in interrupt context
/// and must not block.
///
/// Starting, stopping and restarting a run stay with the controller, so a
/// hook cannot leave the ramp idle while the timer is still running:
///
/// ```compile_fail
/// fn hook(ramp: &mut stepper_pwm::Ramp) {
///     ramp.halt();
/// }
/// ```
pub trait AppCorrection {
    /// Inspect or adjust the ramp for the upcoming step.
    fn apply(&mut self, ramp: &mut Ramp);
}

impl<F> AppCorrection for F
where
    F: FnMut(&mut Ramp),
{
    #[inline]
    fn apply(&mut self, ramp: &mut Ramp) {
        self(ramp)
    }
}

/// Correction that leaves the ramp untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCorrection;

impl AppCorrection for NoCorrection {
    #[inline]
    fn apply(&mut self, _ramp: &mut Ramp) {}
}
