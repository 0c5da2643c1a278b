//! Battery voltage monitoring
//!
//! The control loop only consumes a compensated voltage in volts and two
//! fixed thresholds; how the sample is produced stays behind the trait.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::error::DoorbellError;

/// Below this the battery indicator turns red
pub const LOW_VOLTAGE: f32 = 3.4;

/// Below this the system must stop to protect the battery
pub const CRITICAL_VOLTAGE: f32 = 2.9;

/// Source of compensated battery voltage samples
pub trait BatteryMonitor {
    /// Sample the battery voltage in volts
    fn sample_voltage(&mut self) -> Result<f32, DoorbellError>;
}

/// Battery monitor reading a raw ADC count from a sysfs IIO channel
/// (e.g. an MCP3008 exposed at
/// `/sys/bus/iio/devices/iio:device0/in_voltage0_raw`).
///
/// The divider ratio folds the board's resistor divider into a single
/// volts-per-count scale.
pub struct IioBatteryMonitor {
    path: PathBuf,
    volts_per_count: f32,
}

impl IioBatteryMonitor {
    pub fn new(path: PathBuf, volts_per_count: f32) -> Self {
        Self {
            path,
            volts_per_count,
        }
    }

    fn read_raw(&self) -> Result<u32, DoorbellError> {
        let text = fs::read_to_string(&self.path)?;
        text.trim()
            .parse::<u32>()
            .map_err(|e| DoorbellError::Battery(format!("bad ADC reading {:?}: {e}", text.trim())))
    }
}

impl BatteryMonitor for IioBatteryMonitor {
    fn sample_voltage(&mut self) -> Result<f32, DoorbellError> {
        let raw = self.read_raw()?;
        let volts = raw as f32 * self.volts_per_count;
        debug!("battery ADC raw {raw} -> {volts:.2} V");
        Ok(volts)
    }
}
