//! # Raspberry Pi HAL Implementation
//!
//! Hardware abstraction layer implementation for Raspberry Pi 4 and 5,
//! providing SPI communication and GPIO control for the RFM69 module.
//!
//! ## Hardware Setup
//!
//! The RFM69 hangs off SPI0 with chip select and reset on ordinary GPIO
//! lines (BCM numbering):
//!
//! ```text
//! Pi Pin │ BCM GPIO │ RFM69 Pin │ Function
//! ───────┼──────────┼───────────┼─────────────
//! 19     │ GPIO 10  │ MOSI      │ SPI data out
//! 21     │ GPIO 9   │ MISO      │ SPI data in
//! 23     │ GPIO 11  │ SCK       │ SPI clock
//! 24     │ GPIO 8   │ NSS       │ Chip select (software driven)
//! 15     │ GPIO 22  │ RESET     │ Reset (output)
//! 18     │ GPIO 24  │ DIO0      │ PayloadReady interrupt (input)
//! ```
//!
//! Chip select is driven in software so transactions can span multiple
//! SPI calls (address byte followed by a FIFO burst).

use log::info;
use rppal::gpio::{Gpio, OutputPin};
use rppal::spi::{Bus, Error as SpiError, Mode, SlaveSelect, Spi};
use thiserror::Error;

use crate::radio::hal::{Hal, HalError};

/// Default SPI clock for the RFM69 (datasheet maximum is 10 MHz)
pub const SPI_SPEED: u32 = 1_000_000;

/// Errors specific to the Raspberry Pi HAL implementation
#[derive(Error, Debug)]
pub enum RpiHalError {
    /// SPI bus initialization failed
    #[error("SPI initialization failed: {0}")]
    SpiInit(#[from] SpiError),
    /// GPIO initialization failed
    #[error("GPIO initialization failed: {0}")]
    GpioInit(#[from] rppal::gpio::Error),
}

/// GPIO pin assignments for the RFM69 connections (BCM numbering)
#[derive(Debug, Clone)]
pub struct GpioPins {
    /// NSS pin (output) - chip select, active low
    pub cs: u8,
    /// RESET pin (output) - radio reset, active high
    pub reset: u8,
}

impl Default for GpioPins {
    fn default() -> Self {
        Self { cs: 8, reset: 22 }
    }
}

/// HAL implementation backed by rppal SPI and GPIO
pub struct RaspberryPiHal {
    spi: Spi,
    cs: OutputPin,
    reset: OutputPin,
}

impl RaspberryPiHal {
    /// Initialize the SPI bus and control pins
    pub fn new(spi_bus: u8, pins: &GpioPins) -> Result<Self, RpiHalError> {
        let bus = match spi_bus {
            1 => Bus::Spi1,
            _ => Bus::Spi0,
        };
        let spi = Spi::new(bus, SlaveSelect::Ss0, SPI_SPEED, Mode::Mode0)?;

        let gpio = Gpio::new()?;
        let mut cs = gpio.get(pins.cs)?.into_output();
        cs.set_high(); // deselected at rest
        let mut reset = gpio.get(pins.reset)?.into_output();
        reset.set_low();

        info!(
            "Raspberry Pi HAL initialized - SPI{}, CS GPIO {}, RESET GPIO {}",
            spi_bus, pins.cs, pins.reset
        );
        Ok(Self { spi, cs, reset })
    }
}

impl Hal for RaspberryPiHal {
    fn select(&mut self) -> Result<(), HalError> {
        self.cs.set_low();
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), HalError> {
        self.cs.set_high();
        Ok(())
    }

    fn write(&mut self, tx: &[u8]) -> Result<(), HalError> {
        self.spi
            .write(tx)
            .map(|_| ())
            .map_err(|e| HalError::Spi(format!("SPI write failed: {e}")))
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), HalError> {
        self.spi
            .transfer(rx, tx)
            .map(|_| ())
            .map_err(|e| HalError::Spi(format!("SPI transfer failed: {e}")))
    }

    fn set_reset(&mut self, level: bool) -> Result<(), HalError> {
        if level {
            self.reset.set_high();
        } else {
            self.reset.set_low();
        }
        Ok(())
    }
}
