use embedded_hal::delay::DelayNs;
use std::thread::sleep;
use std::time::Duration;

/// Delay provider backed by [std::thread::sleep].
///
/// The controller only needs lower bounds on its waits, so oversleeping is harmless.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl StdDelay {
    pub fn new() -> Self {
        StdDelay
    }
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        sleep(Duration::from_millis(ms as u64));
    }
}
