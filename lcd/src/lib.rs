//! Protocol engine for HD44780-class character LCD controllers.
//!
//! The [HD44780 driver](lcd::hd44780::Hd44780) turns text and a small command API into the
//! register writes and timed waits the controller requires. The physical connection is
//! abstracted away behind the [LcdTransport] trait, so the same engine drives a parallel
//! GPIO bus, an I²C port expander or a [simulated controller](sim::SimulatedHd44780).

pub mod config;
pub mod delay;
pub mod lcd;
pub mod sim;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::LcdConfig;
pub use delay::StdDelay;
pub use transport::LcdTransport;

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum LcdError {
    #[error("unsupported display geometry: {width}x{height}")]
    InvalidGeometry { width: u8, height: u8 },
    #[error("tab step must be greater than zero")]
    InvalidTabStep,
    #[error("custom character slot {0} out of range (0-7)")]
    InvalidCustomChar(u8),
}

pub type LcdResult<T> = Result<T, LcdError>;
