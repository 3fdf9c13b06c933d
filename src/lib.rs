//! Drivers for the SL01 UV and light board.
//!
//! The board carries two independent I²C chips:
//!
//! - [`Veml6075`]: UVA/UVB sensor, reports irradiance and UV index
//! - [`Tsl4531`]: ambient light sensor, reports lux
//!
//! Both drivers take any [`embedded_hal::i2c::I2c`] bus and follow the same
//! lifecycle: construct (no bus traffic), `init()`, then read as often as
//! needed. Reading before a successful `init()` fails with
//! [`Error::Uninitialized`] without touching the bus.
//!
//! [`Sl01`] wraps both chips on one shared bus.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod board;
pub mod error;
pub mod median_buffer;
pub mod tsl4531;
pub mod veml6075;

#[cfg(test)]
mod mock_i2c;

pub use board::{BoardError, Sl01, Sl01Reading};
pub use error::Error;
pub use median_buffer::RunningMedianBuffer;
pub use tsl4531::Tsl4531;
pub use veml6075::Veml6075;

/// Default I²C clock used by the board, in Hz.
pub const DEFAULT_CLOCK_SPEED: u32 = 100_000;
