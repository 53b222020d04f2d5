//! Test doubles shared by the unit tests.

use crate::LcdTransport;
use embedded_hal::delay::DelayNs;
use std::cell::RefCell;
use std::rc::Rc;

/// A single transaction seen by [RecordingTransport].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BusOp {
    Nibble(u8),
    Byte(u8),
    DataMode(bool),
    Backlight(bool),
}

/// Handle to the transactions recorded by a [RecordingTransport].
///
/// Stays readable while the driver holds the transport borrowed.
#[derive(Debug, Clone, Default)]
pub struct BusLog(Rc<RefCell<Vec<BusOp>>>);

impl BusLog {
    pub fn ops(&self) -> Vec<BusOp> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Bytes written while RS was low.
    pub fn instructions(&self) -> Vec<u8> {
        self.bytes(false)
    }

    /// Bytes written while RS was high.
    pub fn data(&self) -> Vec<u8> {
        self.bytes(true)
    }

    fn bytes(&self, data: bool) -> Vec<u8> {
        let mut data_mode = false;
        let mut bytes = Vec::new();
        for op in self.0.borrow().iter() {
            match *op {
                BusOp::DataMode(mode) => data_mode = mode,
                BusOp::Byte(byte) if data_mode == data => bytes.push(byte),
                _ => {}
            }
        }
        bytes
    }
}

/// Transport that records every call instead of driving a bus.
#[derive(Debug)]
pub struct RecordingTransport {
    eight_bit: bool,
    setup_calls: usize,
    log: BusLog,
}

impl RecordingTransport {
    pub fn new_4bit() -> Self {
        RecordingTransport {
            eight_bit: false,
            setup_calls: 0,
            log: BusLog::default(),
        }
    }

    pub fn new_8bit() -> Self {
        RecordingTransport {
            eight_bit: true,
            ..Self::new_4bit()
        }
    }

    pub fn log(&self) -> BusLog {
        self.log.clone()
    }

    pub fn setup_calls(&self) -> usize {
        self.setup_calls
    }

    fn push(&self, op: BusOp) {
        self.log.0.borrow_mut().push(op);
    }
}

impl LcdTransport for RecordingTransport {
    fn setup(&mut self) -> bool {
        self.setup_calls += 1;
        self.eight_bit
    }

    fn write_nibble(&mut self, value: u8) {
        self.push(BusOp::Nibble(value & 0x0F));
    }

    fn write_byte(&mut self, value: u8) {
        self.push(BusOp::Byte(value));
    }

    fn set_data_mode(&mut self, data: bool) {
        self.push(BusOp::DataMode(data));
    }

    fn set_backlight(&mut self, on: bool) {
        self.push(BusOp::Backlight(on));
    }
}

/// Handle to the waits recorded by a [RecordingDelay], in microseconds.
#[derive(Debug, Clone, Default)]
pub struct DelayLog(Rc<RefCell<Vec<u32>>>);

impl DelayLog {
    pub fn recorded(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

/// Delay provider that returns immediately and records what it was asked to wait.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    waits: DelayLog,
}

impl RecordingDelay {
    pub fn waits(&self) -> DelayLog {
        self.waits.clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits.0.borrow_mut().push(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.waits.0.borrow_mut().push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits.0.borrow_mut().push(ms * 1000);
    }
}
