//! # Output Power Calculation
//!
//! Pure mapping from a requested output power in dBm to the PA register
//! values, kept separate from the driver so the piecewise table is testable
//! without a bus.
//!
//! Standard modules (RFM69W) drive PA0 on pin RFIO and cover -18..+13 dBm.
//! High power modules (RFM69HW) drive PA1, or PA1+PA2 combined, on pin
//! PA_BOOST and cover -2..+20 dBm; the top segment above +17 dBm
//! additionally requires the high power test registers to be switched to
//! their boost values.

use crate::radio::driver::Rfm69Error;
use crate::radio::registers::*;

/// Overall output power range across both module classes
pub const POUT_MIN_DBM: i8 = -18;
pub const POUT_MAX_DBM: i8 = 20;

/// Ceiling of the standard (PA0) class
pub const PA0_MAX_DBM: i8 = 13;

/// Floor of the high power (PA_BOOST) class
pub const PA_BOOST_MIN_DBM: i8 = -2;

/// Computed PA register state for one requested power level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaConfig {
    /// Value for RegPaLevel: PA selector bits plus the output power field
    pub pa_level: u8,
    /// Values for (RegTestPa1, RegTestPa2); `None` on standard modules,
    /// which must not touch the high power test registers
    pub test_pa: Option<(u8, u8)>,
}

/// Map a requested power to PA register values.
///
/// Three distinct rejections, all before any register write: outside the
/// overall -18..=20 dBm range, above the +13 dBm ceiling of a standard
/// module, or below the -2 dBm floor of a high power module.
pub fn pa_config(dbm: i8, high_power: bool) -> Result<PaConfig, Rfm69Error> {
    if !(POUT_MIN_DBM..=POUT_MAX_DBM).contains(&dbm) {
        return Err(Rfm69Error::PowerOutOfRange { dbm });
    }
    if !high_power && dbm > PA0_MAX_DBM {
        return Err(Rfm69Error::PowerAboveStandardCeiling { dbm });
    }
    if high_power && dbm < PA_BOOST_MIN_DBM {
        return Err(Rfm69Error::PowerBelowHighPowerFloor { dbm });
    }

    if !high_power {
        // Pout = -18 + OutputPower, PA0 on pin RFIO
        return Ok(PaConfig {
            pa_level: RF_PALEVEL_PA0_ON | (dbm + 18) as u8,
            test_pa: None,
        });
    }

    let config = if dbm <= 13 {
        // Pout = -18 + OutputPower, PA1 alone on PA_BOOST
        PaConfig {
            pa_level: RF_PALEVEL_PA1_ON | (dbm + 18) as u8,
            test_pa: Some((RF_TESTPA1_NORMAL, RF_TESTPA2_NORMAL)),
        }
    } else if dbm <= 17 {
        // Pout = -14 + OutputPower, PA1 and PA2 combined
        PaConfig {
            pa_level: RF_PALEVEL_PA1_PA2_ON | (dbm + 14) as u8,
            test_pa: Some((RF_TESTPA1_NORMAL, RF_TESTPA2_NORMAL)),
        }
    } else {
        // Pout = -11 + OutputPower, PA1 and PA2 with the boost registers on
        PaConfig {
            pa_level: RF_PALEVEL_PA1_PA2_ON | (dbm + 11) as u8,
            test_pa: Some((RF_TESTPA1_BOOST, RF_TESTPA2_BOOST)),
        }
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_class_segment() {
        // Single segment, PA0 selector, offset +18
        assert_eq!(
            pa_config(-18, false).unwrap(),
            PaConfig { pa_level: 0x80, test_pa: None }
        );
        assert_eq!(
            pa_config(0, false).unwrap(),
            PaConfig { pa_level: 0x80 | 18, test_pa: None }
        );
        assert_eq!(
            pa_config(13, false).unwrap(),
            PaConfig { pa_level: 0x80 | 31, test_pa: None }
        );
    }

    #[test]
    fn high_power_low_segment() {
        // [-2, 13]: PA1 alone, offset +18, boost off
        assert_eq!(
            pa_config(-2, true).unwrap(),
            PaConfig { pa_level: 0x40 | 16, test_pa: Some((0x55, 0x70)) }
        );
        assert_eq!(
            pa_config(13, true).unwrap(),
            PaConfig { pa_level: 0x40 | 31, test_pa: Some((0x55, 0x70)) }
        );
    }

    #[test]
    fn high_power_middle_segment() {
        // (13, 17]: PA1+PA2, offset +14, boost off
        assert_eq!(
            pa_config(14, true).unwrap(),
            PaConfig { pa_level: 0x60 | 28, test_pa: Some((0x55, 0x70)) }
        );
        assert_eq!(
            pa_config(17, true).unwrap(),
            PaConfig { pa_level: 0x60 | 31, test_pa: Some((0x55, 0x70)) }
        );
    }

    #[test]
    fn high_power_boost_segment() {
        // (17, 20]: PA1+PA2, offset +11, boost registers on
        assert_eq!(
            pa_config(18, true).unwrap(),
            PaConfig { pa_level: 0x60 | 29, test_pa: Some((0x5D, 0x7C)) }
        );
        assert_eq!(
            pa_config(20, true).unwrap(),
            PaConfig { pa_level: 0x60 | 31, test_pa: Some((0x5D, 0x7C)) }
        );
    }

    #[test]
    fn out_of_range_rejections_are_distinct() {
        assert!(matches!(
            pa_config(-19, false),
            Err(Rfm69Error::PowerOutOfRange { dbm: -19 })
        ));
        assert!(matches!(
            pa_config(21, true),
            Err(Rfm69Error::PowerOutOfRange { dbm: 21 })
        ));
        assert!(matches!(
            pa_config(14, false),
            Err(Rfm69Error::PowerAboveStandardCeiling { dbm: 14 })
        ));
        assert!(matches!(
            pa_config(-3, true),
            Err(Rfm69Error::PowerBelowHighPowerFloor { dbm: -3 })
        ));
    }
}
