//! # RFM69 Register Definitions and Constants
//!
//! Register addresses, bit fields, and fixed configuration for the HopeRF
//! RFM69W/RFM69HW transceiver, based on the RFM69 datasheet. Only the
//! registers the doorbell actually touches are listed here.
//!
//! ## Register Map
//!
//! - 0x00-0x0F: FIFO, operating mode, data modulation, listen mode
//! - 0x10-0x2F: RF settings (frequency, power, bandwidth, RSSI, DIO mapping)
//! - 0x30-0x3F: Sync word and packet configuration
//! - 0x58+: Factory test registers (sensitivity, high power PA)

// =============================================================================
// RFM69 Register Addresses
// =============================================================================

/// FIFO read/write access register
pub const REG_FIFO: u8 = 0x00;

/// Operating mode, listen mode control
pub const REG_OPMODE: u8 = 0x01;

/// Data processing mode and modulation scheme
pub const REG_DATAMODUL: u8 = 0x02;

/// Bit rate setting (MSB)
pub const REG_BITRATEMSB: u8 = 0x03;

/// Bit rate setting (LSB)
pub const REG_BITRATELSB: u8 = 0x04;

/// Frequency deviation setting (MSB)
pub const REG_FDEVMSB: u8 = 0x05;

/// Frequency deviation setting (LSB)
pub const REG_FDEVLSB: u8 = 0x06;

/// RF carrier frequency setting (MSB)
pub const REG_FRFMSB: u8 = 0x07;

/// RF carrier frequency setting (MID)
pub const REG_FRFMID: u8 = 0x08;

/// RF carrier frequency setting (LSB)
pub const REG_FRFLSB: u8 = 0x09;

/// Listen mode resolutions and exit condition
pub const REG_LISTEN1: u8 = 0x0D;

/// Listen mode idle-phase coefficient
pub const REG_LISTEN2: u8 = 0x0E;

/// Listen mode receive-phase coefficient
pub const REG_LISTEN3: u8 = 0x0F;

/// PA selection and output power control
pub const REG_PALEVEL: u8 = 0x11;

/// Over current protection control
pub const REG_OCP: u8 = 0x13;

/// LNA settings
pub const REG_LNA: u8 = 0x18;

/// Channel filter bandwidth control
pub const REG_RXBW: u8 = 0x19;

/// Mapping of pins DIO0 to DIO3
pub const REG_DIOMAPPING1: u8 = 0x25;

/// Status register: mode ready, PLL lock, RSSI
pub const REG_IRQFLAGS1: u8 = 0x27;

/// Status register: FIFO handling flags, packet sent, payload ready
pub const REG_IRQFLAGS2: u8 = 0x28;

/// RSSI trigger level for listen mode wake-up
pub const REG_RSSITHRESH: u8 = 0x29;

/// Timeout between RX request and RSSI detection
pub const REG_RXTIMEOUT1: u8 = 0x2A;

/// Timeout between RSSI detection and PayloadReady
pub const REG_RXTIMEOUT2: u8 = 0x2B;

/// Preamble length (MSB)
pub const REG_PREAMBLEMSB: u8 = 0x2C;

/// Preamble length (LSB)
pub const REG_PREAMBLELSB: u8 = 0x2D;

/// Sync word recognition control
pub const REG_SYNCCONFIG: u8 = 0x2E;

/// Sync word byte 1
pub const REG_SYNCVALUE1: u8 = 0x2F;

/// Sync word byte 2
pub const REG_SYNCVALUE2: u8 = 0x30;

/// Packet mode settings
pub const REG_PACKETCONFIG1: u8 = 0x37;

/// Fixed payload length
pub const REG_PAYLOADLENGTH: u8 = 0x38;

/// FIFO threshold, TX start condition
pub const REG_FIFOTHRESH: u8 = 0x3C;

/// Sensitivity mode test register
pub const REG_TESTLNA: u8 = 0x58;

/// High power PA test register 1
pub const REG_TESTPA1: u8 = 0x5A;

/// High power PA test register 2
pub const REG_TESTPA2: u8 = 0x5C;

// =============================================================================
// Operating Mode Field
// =============================================================================

/// SPI address byte flag selecting a register write
pub const RF_SPI_WRITE_FLAG: u8 = 0x80;

/// Shift of the 3-bit mode field inside RegOpMode
pub const RF_OPMODE_SHIFT: u8 = 2;

/// Mask of the 3-bit mode field inside RegOpMode
pub const RF_OPMODE_MASK: u8 = 0x07;

/// ListenOn bit in RegOpMode
pub const RF_OPMODE_LISTEN_ON: u8 = 0x40;

/// ListenAbort bit in RegOpMode
pub const RF_OPMODE_LISTEN_ABORT: u8 = 0x20;

// =============================================================================
// IRQ Flag Definitions
// =============================================================================

/// IRQ flags in RegIrqFlags1
pub const RF_IRQFLAGS1_MODEREADY: u8 = 0x80;

/// IRQ flags in RegIrqFlags2
pub const RF_IRQFLAGS2_FIFOFULL: u8 = 0x80;
pub const RF_IRQFLAGS2_FIFONOTEMPTY: u8 = 0x40;
pub const RF_IRQFLAGS2_FIFOOVERRUN: u8 = 0x10;
pub const RF_IRQFLAGS2_PACKETSENT: u8 = 0x08;
pub const RF_IRQFLAGS2_PAYLOADREADY: u8 = 0x04;

// =============================================================================
// Listen Mode Constants
// =============================================================================

/// ListenEnd = 10 in RegListen1: resume listen mode after PayloadReady
pub const RF_LISTEN1_END_RESUME: u8 = 0x02 << 1;

/// Shift of ListenResolRx inside RegListen1
pub const RF_LISTEN1_RESOL_RX_SHIFT: u8 = 4;

/// Shift of ListenResolIdle inside RegListen1
pub const RF_LISTEN1_RESOL_IDLE_SHIFT: u8 = 6;

/// RSSI wake-up threshold for listen mode: -90 dBm
pub const RF_LISTEN_RSSI_THRESHOLD: u8 = 0xB4;

/// RX start / RSSI timeout for listen mode: 62 * 16 bit periods at the
/// fixed 10 kbps bitrate, i.e. about 100 ms. Tied to the base
/// configuration's bitrate and deliberately not parameterized.
pub const RF_LISTEN_RX_TIMEOUT: u8 = 0x3E;

// =============================================================================
// Power Amplifier Constants
// =============================================================================

/// PA0 enabled, output on pin RFIO (standard power modules)
pub const RF_PALEVEL_PA0_ON: u8 = 0x80;

/// PA1 enabled, output on pin PA_BOOST (high power modules)
pub const RF_PALEVEL_PA1_ON: u8 = 0x40;

/// PA1 and PA2 combined on pin PA_BOOST
pub const RF_PALEVEL_PA1_PA2_ON: u8 = 0x60;

/// RegTestPa1/RegTestPa2 values with the +20 dBm boost disabled
pub const RF_TESTPA1_NORMAL: u8 = 0x55;
pub const RF_TESTPA2_NORMAL: u8 = 0x70;

/// RegTestPa1/RegTestPa2 values enabling the +20 dBm boost
pub const RF_TESTPA1_BOOST: u8 = 0x5D;
pub const RF_TESTPA2_BOOST: u8 = 0x7C;

/// OCP base value; the OcpOn bit is added for standard power modules
pub const RF_OCP_TRIM: u8 = 0x0A;
pub const RF_OCP_ON: u8 = 0x10;

// =============================================================================
// Fixed RF Configuration
// =============================================================================

/// Base configuration applied at initialization, in order.
///
/// Fixed-length 1-byte payload at 10 kbps FSK on 433.42 MHz with 20 kHz
/// deviation, 2-byte sync word 0x2025, CRC and whitening enabled.
pub const BASE_CONFIG: [(u8, u8); 21] = [
    (REG_OPMODE, 0x04),        // Standby mode
    (REG_DATAMODUL, 0x00),     // Packet mode, FSK, no shaping
    (REG_BITRATEMSB, 0x0C),    // 10 kbps
    (REG_BITRATELSB, 0x80),
    (REG_FDEVMSB, 0x01),       // 20 kHz
    (REG_FDEVLSB, 0x48),
    (REG_FRFMSB, 0x6C),        // 433.42 MHz
    (REG_FRFMID, 0x5A),
    (REG_FRFLSB, 0xE1),
    (REG_LNA, 0x88),           // 200 Ohm impedance, gain set by AGC loop
    (REG_RXBW, 0x4C),          // 25 kHz
    (REG_PREAMBLEMSB, 0x00),   // 3 bytes preamble
    (REG_DIOMAPPING1, 0x40),   // DIO0 = PayloadReady
    (REG_PREAMBLELSB, 0x03),
    (REG_SYNCCONFIG, 0x88),    // Sync word on, 2 bytes
    (REG_SYNCVALUE1, 0x20),    // Sync word 0x2025
    (REG_SYNCVALUE2, 0x25),
    (REG_PACKETCONFIG1, 0x50), // Fixed length, CRC on, whitening
    (REG_PAYLOADLENGTH, 0x01), // 1 byte payload
    (REG_FIFOTHRESH, 0x80),    // TxStart on FifoNotEmpty
    (REG_TESTLNA, 0x1B),       // Normal sensitivity mode
];
