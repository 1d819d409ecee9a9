//! Capability-typed digital pin.
//!
//! Whether a pin can be read or written is decided by its capability tag, so
//! a write on an input pin does not compile.

use core::convert::Infallible;
use core::marker::PhantomData;
use core::ops::Not;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use super::port::GpioPort;

/// Logic level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0.
    #[default]
    Low,
    /// Logic 1.
    High,
}

impl Not for Level {
    type Output = Level;

    #[inline]
    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

/// Read-only capability tag.
#[derive(Debug, Clone, Copy)]
pub struct Input;

/// Write-only capability tag.
#[derive(Debug, Clone, Copy)]
pub struct Output;

/// Read and write capability tag.
#[derive(Debug, Clone, Copy)]
pub struct InputOutput;

/// Tags that allow reading the input register.
pub trait CanRead: private::Sealed {}

/// Tags that allow driving the line.
pub trait CanWrite: private::Sealed {}

impl CanRead for Input {}
impl CanRead for InputOutput {}
impl CanWrite for Output {}
impl CanWrite for InputOutput {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Input {}
    impl Sealed for super::Output {}
    impl Sealed for super::InputOutput {}
}

/// A pin that can be sampled.
pub trait Readable {
    /// Sample the line, applying inversion.
    fn read(&self) -> Level;
}

/// A pin that can be driven.
pub trait Writable {
    /// Drive the line to a logical level.
    fn write(&mut self, level: Level);

    /// Flip the physical line.
    fn toggle(&mut self);
}

/// One GPIO line on a port.
///
/// Name, port and mask are fixed at construction. The type is neither `Clone`
/// nor `Copy`: each value owns its hardware binding.
pub struct Pin<P, C> {
    name: &'static str,
    port: P,
    mask: u16,
    inverted: bool,
    state: Level,
    _cap: PhantomData<C>,
}

impl<P: GpioPort, C> Pin<P, C> {
    /// Bind a pin to `mask` on `port`.
    pub const fn new(name: &'static str, port: P, mask: u16) -> Self {
        Self {
            name,
            port,
            mask,
            inverted: false,
            state: Level::Low,
            _cap: PhantomData,
        }
    }

    /// Logical name given at construction.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bit mask of the line within its port.
    #[inline]
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// Last level cached by `write` or `refresh`.
    #[inline]
    pub fn state(&self) -> Level {
        self.state
    }

    /// Whether the pin was marked inverted.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Mark the pin as inverted. There is no way back.
    pub fn set_inverted(&mut self) {
        self.inverted = true;
    }

    /// Give the port handle back.
    pub fn release(self) -> P {
        self.port
    }
}

impl<P: GpioPort, C: CanRead> Pin<P, C> {
    /// Sample the line and cache the result.
    pub fn refresh(&mut self) -> Level {
        self.state = self.read();
        self.state
    }
}

impl<P: GpioPort, C: CanRead> Readable for Pin<P, C> {
    fn read(&self) -> Level {
        let raw = Level::from(self.port.input() & u32::from(self.mask) != 0);
        if self.inverted {
            !raw
        } else {
            raw
        }
    }
}

impl<P: GpioPort, C: CanWrite> Writable for Pin<P, C> {
    /// The cached state records the logical `level`; inversion only changes
    /// which register is written.
    fn write(&mut self, level: Level) {
        let mask = u32::from(self.mask);
        if (level == Level::High) != self.inverted {
            self.port.set_reset(mask);
        } else {
            self.port.reset(mask);
        }
        self.state = level;
    }

    /// Reads ODR once and issues a single BSRR store. The cached state is
    /// left alone.
    fn toggle(&mut self) {
        let mask = u32::from(self.mask);
        let odr = self.port.output();
        self.port.set_reset(((odr & mask) << 16) | (!odr & mask));
    }
}

impl<P, C> ErrorType for Pin<P, C> {
    type Error = Infallible;
}

impl<P: GpioPort, C: CanRead> InputPin for Pin<P, C> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read() == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read() == Level::Low)
    }
}

impl<P: GpioPort, C: CanWrite> OutputPin for Pin<P, C> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(Level::High);
        Ok(())
    }
}

impl<P: GpioPort, C: CanWrite> StatefulOutputPin for Pin<P, C> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        let driven = self.port.output() & u32::from(self.mask) != 0;
        Ok(driven != self.inverted)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Writable::toggle(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Write {
        SetReset(u32),
        Reset(u32),
    }

    #[derive(Default)]
    struct FakePort {
        idr: Cell<u32>,
        odr: Cell<u32>,
        writes: RefCell<heapless::Vec<Write, 16>>,
    }

    impl GpioPort for FakePort {
        fn input(&self) -> u32 {
            self.idr.get()
        }

        fn output(&self) -> u32 {
            self.odr.get()
        }

        fn set_reset(&self, word: u32) {
            let odr = (self.odr.get() | (word & 0xFFFF)) & !(word >> 16);
            self.odr.set(odr);
            self.writes.borrow_mut().push(Write::SetReset(word)).unwrap();
        }

        fn reset(&self, mask: u32) {
            self.odr.set(self.odr.get() & !mask);
            self.writes.borrow_mut().push(Write::Reset(mask)).unwrap();
        }
    }

    #[test]
    fn test_write_high_then_low() {
        let port = FakePort::default();
        let mut pin: Pin<_, Output> = Pin::new("led", &port, 0x0020);

        pin.write(Level::High);
        pin.write(Level::Low);

        assert_eq!(
            port.writes.borrow().as_slice(),
            &[Write::SetReset(0x0020), Write::Reset(0x0020)]
        );
        assert_eq!(pin.state(), Level::Low);
    }

    #[test]
    fn test_inverted_write_swaps_registers_but_caches_logical_level() {
        let port = FakePort::default();
        let mut pin: Pin<_, Output> = Pin::new("enable", &port, 0x0001);
        pin.set_inverted();

        pin.write(Level::High);

        assert_eq!(port.writes.borrow().as_slice(), &[Write::Reset(0x0001)]);
        assert_eq!(pin.state(), Level::High);
    }

    #[test]
    fn test_read_applies_inversion() {
        let port = FakePort::default();
        port.idr.set(0x0004);

        let mut plain: Pin<_, Input> = Pin::new("sense", &port, 0x0004);
        assert_eq!(plain.read(), Level::High);
        assert_eq!(plain.refresh(), Level::High);
        assert_eq!(plain.state(), Level::High);

        let mut inverted: Pin<_, Input> = Pin::new("sense_n", &port, 0x0004);
        inverted.set_inverted();
        assert_eq!(inverted.read(), Level::Low);

        let other: Pin<_, Input> = Pin::new("other", &port, 0x0008);
        assert_eq!(other.read(), Level::Low);
        assert!(port.writes.borrow().is_empty());
    }

    #[test]
    fn test_toggle_uses_single_set_reset_write() {
        let port = FakePort::default();
        port.odr.set(0x0010);
        let mut pin: Pin<_, Output> = Pin::new("step", &port, 0x0010);

        Writable::toggle(&mut pin);
        assert_eq!(port.odr.get(), 0x0000);
        Writable::toggle(&mut pin);
        assert_eq!(port.odr.get(), 0x0010);

        assert_eq!(
            port.writes.borrow().as_slice(),
            &[Write::SetReset(0x0010 << 16), Write::SetReset(0x0010)]
        );
    }

    #[test]
    fn test_embedded_hal_traits() {
        let port = FakePort::default();
        let mut pin: Pin<_, InputOutput> = Pin::new("aux", &port, 0x0002);

        pin.set_high().unwrap();
        assert!(pin.is_set_high().unwrap());
        StatefulOutputPin::toggle(&mut pin).unwrap();
        assert!(pin.is_set_low().unwrap());

        port.idr.set(0x0002);
        assert!(pin.is_high().unwrap());
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(!Level::High, Level::Low);
        assert_eq!(Level::from(true), Level::High);
        assert!(!bool::from(Level::Low));
    }
}
