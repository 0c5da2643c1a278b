//! # Hardware Abstraction Layer for the Radio Bus
//!
//! This module defines the HAL trait the RFM69 driver is generic over, plus
//! platform implementations. The trait exposes only the primitives the
//! doorbell needs: chip-select control, full-duplex SPI transfers, and the
//! reset line. The driver never touches a concrete bus peripheral.

use thiserror::Error;

/// Errors that can occur during HAL operations
#[derive(Debug, Error)]
pub enum HalError {
    #[error("SPI communication error: {0}")]
    Spi(String),

    #[error("GPIO operation error: {0}")]
    Gpio(String),
}

/// Hardware Abstraction Layer trait for RFM69 bus access
///
/// A transaction is bracketed by [`select`](Hal::select) and
/// [`deselect`](Hal::deselect); callers must release chip select on every
/// path. Bus failures are not retried at this layer.
pub trait Hal {
    /// Assert the chip-select line (active low on the wire)
    fn select(&mut self) -> Result<(), HalError>;

    /// Release the chip-select line
    fn deselect(&mut self) -> Result<(), HalError>;

    /// Write bytes to the bus, discarding the received bytes
    fn write(&mut self, tx: &[u8]) -> Result<(), HalError>;

    /// Full-duplex transfer: shift out `tx` while filling `rx`
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), HalError>;

    /// Drive the radio reset line
    fn set_reset(&mut self, level: bool) -> Result<(), HalError>;
}

pub mod mock;

#[cfg(feature = "raspberry-pi")]
pub mod raspberry_pi;

pub use mock::MockHal;

#[cfg(feature = "raspberry-pi")]
pub use raspberry_pi::{GpioPins, RaspberryPiHal};
