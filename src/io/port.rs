//! Hardware-access port for one GPIO bank.

/// Register view of a GPIO port.
///
/// Implementations map these onto the real registers (IDR, ODR, BSRR, BRR on
/// STM32 parts) or onto a test double. Writes through `set_reset` and `reset`
/// must be single atomic stores: no read-modify-write.
pub trait GpioPort {
    /// Read the input data register.
    fn input(&self) -> u32;

    /// Read the output data register.
    fn output(&self) -> u32;

    /// Write the bit set/reset register.
    ///
    /// Bits 0-15 set the matching lines, bits 16-31 reset them.
    fn set_reset(&self, word: u32);

    /// Write the bit reset register.
    fn reset(&self, mask: u32);
}

impl<P: GpioPort + ?Sized> GpioPort for &P {
    #[inline]
    fn input(&self) -> u32 {
        (**self).input()
    }

    #[inline]
    fn output(&self) -> u32 {
        (**self).output()
    }

    #[inline]
    fn set_reset(&self, word: u32) {
        (**self).set_reset(word)
    }

    #[inline]
    fn reset(&self, mask: u32) {
        (**self).reset(mask)
    }
}
