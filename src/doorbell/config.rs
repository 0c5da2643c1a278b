//! Doorbell configuration
//!
//! Loadable from JSON:
//! ```json
//! {
//!   "spi_bus": 0,
//!   "cs_pin": 8,
//!   "reset_pin": 22,
//!   "dio0_pin": 24,
//!   "button_pin": 17,
//!   "power_dbm": 20,
//!   "code": 66
//! }
//! ```
//! Every field has a default matching the reference hardware; a missing
//! config file just means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::doorbell::battery::{CRITICAL_VOLTAGE, LOW_VOLTAGE};
use crate::error::DoorbellError;
use crate::radio::driver::{ListenResolution, ListenTiming};

/// The single-byte code a doorbell transmission carries
pub const DOORBELL_CODE: u8 = 0x42;

/// Minimum on-air duration of one button press, in milliseconds. The code
/// is re-sent until this window elapses so a duty-cycled receiver is
/// guaranteed to catch at least one frame.
pub const SEND_DURATION_MS: u64 = 280;

/// Configuration for the doorbell application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorbellConfig {
    /// SPI bus number (0 or 1)
    pub spi_bus: u8,
    /// Chip select GPIO (BCM)
    pub cs_pin: u8,
    /// Radio reset GPIO (BCM)
    pub reset_pin: u8,
    /// Radio DIO0 interrupt GPIO (BCM)
    pub dio0_pin: u8,
    /// Doorbell switch GPIO (BCM)
    pub button_pin: u8,
    /// Green LED GPIO (BCM)
    pub green_led_pin: u8,
    /// Red LED GPIO (BCM)
    pub red_led_pin: u8,

    /// High power module (RFM69HW) fitted
    pub high_power: bool,
    /// Output power in dBm
    pub power_dbm: i8,
    /// Code transmitted on a button press and expected in receptions
    pub code: u8,
    /// Minimum on-air window per button press, milliseconds
    pub send_duration_ms: u64,

    /// Listen mode idle phase (0.26 s sleep between sniffs)
    pub listen_idle: ListenTiming,
    /// Listen mode receive phase (a 1 ms sniff)
    pub listen_rx: ListenTiming,

    /// Voltage below which the indicator turns red
    pub low_voltage: f32,
    /// Voltage below which the system shuts down
    pub critical_voltage: f32,
    /// sysfs IIO channel carrying the raw battery ADC value
    pub battery_adc_path: PathBuf,
    /// Volts per ADC count, divider ratio included
    pub battery_volts_per_count: f32,
}

impl Default for DoorbellConfig {
    fn default() -> Self {
        Self {
            spi_bus: 0,
            cs_pin: 8,
            reset_pin: 22,
            dio0_pin: 24,
            button_pin: 17,
            green_led_pin: 23,
            red_led_pin: 25,
            high_power: true,
            power_dbm: 20,
            code: DOORBELL_CODE,
            send_duration_ms: SEND_DURATION_MS,
            listen_idle: ListenTiming::new(ListenResolution::Ms262, 1),
            listen_rx: ListenTiming::new(ListenResolution::Us64, 16),
            low_voltage: LOW_VOLTAGE,
            critical_voltage: CRITICAL_VOLTAGE,
            battery_adc_path: PathBuf::from("/sys/bus/iio/devices/iio:device0/in_voltage0_raw"),
            // 10-bit ADC, 3.3 V reference, 1.56 divider ratio
            battery_volts_per_count: 3.3 / 1023.0 * 1.56,
        }
    }
}

impl DoorbellConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, DoorbellError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| DoorbellError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_hardware() {
        let config = DoorbellConfig::default();
        assert_eq!(config.code, 0x42);
        assert_eq!(config.send_duration_ms, 280);
        assert_eq!(config.power_dbm, 20);
        assert!(config.high_power);
        assert_eq!(config.listen_idle.coef, 1);
        assert_eq!(config.listen_rx.coef, 16);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: DoorbellConfig =
            serde_json::from_str(r#"{ "power_dbm": 13, "high_power": false }"#).unwrap();
        assert_eq!(config.power_dbm, 13);
        assert!(!config.high_power);
        assert_eq!(config.code, DOORBELL_CODE);
    }
}
