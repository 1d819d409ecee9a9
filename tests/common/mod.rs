//! Test doubles for the GPIO and timer ports.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stepper_pwm::{GpioPort, PwmTimer};

/// One store to a GPIO register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortWrite {
    SetReset(u32),
    Reset(u32),
}

/// GPIO bank that records every store and keeps an ODR image.
#[derive(Default)]
pub struct FakePort {
    pub idr: Cell<u32>,
    odr: Cell<u32>,
    writes: RefCell<Vec<PortWrite>>,
}

impl FakePort {
    pub fn writes(&self) -> Vec<PortWrite> {
        self.writes.borrow().clone()
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn odr(&self) -> u32 {
        self.odr.get()
    }
}

impl GpioPort for FakePort {
    fn input(&self) -> u32 {
        self.idr.get()
    }

    fn output(&self) -> u32 {
        self.odr.get()
    }

    fn set_reset(&self, word: u32) {
        self.odr.set((self.odr.get() | (word & 0xFFFF)) & !(word >> 16));
        self.writes.borrow_mut().push(PortWrite::SetReset(word));
    }

    fn reset(&self, mask: u32) {
        self.odr.set(self.odr.get() & !mask);
        self.writes.borrow_mut().push(PortWrite::Reset(mask));
    }
}

/// One timer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    AutoReload(u16),
    Compare(u8, u16),
    Start(u8),
    Stop(u8),
}

/// Timer double; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingTimer {
    ops: Rc<RefCell<Vec<TimerOp>>>,
}

impl RecordingTimer {
    pub fn ops(&self) -> Vec<TimerOp> {
        self.ops.borrow().clone()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Last programmed auto-reload value, if any.
    pub fn last_auto_reload(&self) -> Option<u16> {
        self.ops.borrow().iter().rev().find_map(|op| match op {
            TimerOp::AutoReload(v) => Some(*v),
            _ => None,
        })
    }
}

impl PwmTimer for RecordingTimer {
    fn set_auto_reload(&mut self, value: u16) {
        self.ops.borrow_mut().push(TimerOp::AutoReload(value));
    }

    fn set_compare(&mut self, channel: u8, value: u16) {
        self.ops.borrow_mut().push(TimerOp::Compare(channel, value));
    }

    fn start_pwm_interrupt(&mut self, channel: u8) {
        self.ops.borrow_mut().push(TimerOp::Start(channel));
    }

    fn stop_pwm_interrupt(&mut self, channel: u8) {
        self.ops.borrow_mut().push(TimerOp::Stop(channel));
    }
}
