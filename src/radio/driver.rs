//! # RFM69 Radio Driver
//!
//! Synchronous driver for the HopeRF RFM69W/RFM69HW transceiver as used by
//! the doorbell: fixed-length 1-byte payloads at 10 kbps FSK on 433.42 MHz,
//! with the discontinuous listen mode carrying most of the battery budget.
//!
//! ## Architecture
//!
//! The driver is generic over a [`Hal`] implementation:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │       Doorbell application      │
//! ├─────────────────────────────────┤
//! │      Rfm69<H> (this file)       │
//! ├─────────────────────────────────┤
//! │      HAL Abstraction Layer      │
//! ├─────────────────────────────────┤
//! │    Platform-specific HAL impl   │
//! └─────────────────────────────────┘
//! ```
//!
//! The operating mode is never cached: every mode decision re-reads
//! RegOpMode, so the hardware stays the single source of truth.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use doorbell_rs::radio::driver::{ListenResolution, ListenTiming, Rfm69};
//! use doorbell_rs::radio::hal::MockHal;
//!
//! let mut radio = Rfm69::new(MockHal::new(), true);
//! radio.init()?;
//! radio.set_power_dbm(20)?;
//! radio.enable_listen_mode(
//!     ListenTiming::new(ListenResolution::Ms262, 1),
//!     ListenTiming::new(ListenResolution::Us64, 16),
//! )?;
//! # Ok::<(), doorbell_rs::radio::driver::Rfm69Error>(())
//! ```

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::radio::hal::{Hal, HalError};
use crate::radio::power::pa_config;
use crate::radio::registers::*;

/// Budget for the mode-ready and packet-sent waits. Sized to exceed the
/// worst-case PLL lock and TX buffer drain time with margin.
pub const WAIT_TIMEOUT: Duration = Duration::from_millis(4000);

/// Poll interval while waiting on a status flag
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Driver errors
#[derive(Debug, Error)]
pub enum Rfm69Error {
    /// Mode value outside the 3-bit field's legal 0..=4 range
    #[error("invalid radio mode value: {0}")]
    InvalidMode(u8),

    /// Requested power outside the overall -18..=20 dBm range
    #[error("output power {dbm} dBm outside -18..=20 dBm")]
    PowerOutOfRange { dbm: i8 },

    /// Standard modules top out at +13 dBm
    #[error("output power {dbm} dBm above the +13 dBm standard module ceiling")]
    PowerAboveStandardCeiling { dbm: i8 },

    /// High power modules bottom out at -2 dBm
    #[error("output power {dbm} dBm below the -2 dBm high power module floor")]
    PowerBelowHighPowerFloor { dbm: i8 },

    /// A status flag wait elapsed; callers proceed best-effort
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// Bus transfer failure, not retried at this layer
    #[error("transport error: {0}")]
    Transport(#[from] HalError),
}

/// Operating modes, mirrored 1:1 onto the 3-bit mode field of RegOpMode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadioMode {
    /// Lowest power, everything off
    Sleep = 0,
    /// Crystal oscillator running, registers accessible
    Standby = 1,
    /// PLL locked, ready for immediate TX/RX
    FrequencySynth = 2,
    /// Transmitting
    Transmit = 3,
    /// Receiving
    Receive = 4,
}

impl RadioMode {
    /// Decode a raw mode field value. Values above 4 are rejected before
    /// any bus traffic happens.
    pub fn from_raw(raw: u8) -> Result<Self, Rfm69Error> {
        match raw {
            0 => Ok(RadioMode::Sleep),
            1 => Ok(RadioMode::Standby),
            2 => Ok(RadioMode::FrequencySynth),
            3 => Ok(RadioMode::Transmit),
            4 => Ok(RadioMode::Receive),
            other => Err(Rfm69Error::InvalidMode(other)),
        }
    }

    fn opmode_bits(self) -> u8 {
        (self as u8) << RF_OPMODE_SHIFT
    }
}

/// DIO0 interrupt mappings the doorbell uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dio0Mapping {
    /// DIO0 raises on PayloadReady while receiving
    RxPayloadReady = 1,
    /// DIO0 unmapped during transmit windows
    TxNone = 2,
}

/// Listen mode time base selector (2-bit hardware field)
///
/// | Resolution | Min (coef = 1) | Max (coef = 255) |
/// |------------|----------------|------------------|
/// | `Us64`     | 64 us          | 16 ms            |
/// | `Ms4_1`    | 4.1 ms         | 1.04 s           |
/// | `Ms262`    | 0.26 s         | 67 s             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenResolution {
    /// 64 microsecond unit
    Us64 = 1,
    /// 4.1 millisecond unit
    Ms4_1 = 2,
    /// 262 millisecond unit
    Ms262 = 3,
}

/// One listen mode phase duration: resolution unit times coefficient.
///
/// All coefficient values are legal; degenerate zero-coefficient timings
/// are interpreted by the hardware per its own rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenTiming {
    pub resolution: ListenResolution,
    pub coef: u8,
}

impl ListenTiming {
    pub const fn new(resolution: ListenResolution, coef: u8) -> Self {
        Self { resolution, coef }
    }
}

/// RFM69 driver, generic over the bus HAL.
///
/// `listen_mode_active` is true only between a successful
/// [`enable_listen_mode`](Rfm69::enable_listen_mode) and the following
/// [`disable_listen_mode`](Rfm69::disable_listen_mode); while true,
/// [`receive`](Rfm69::receive) issues no RX mode transitions of its own.
pub struct Rfm69<H: Hal> {
    hal: H,
    high_power: bool,
    listen_mode_active: bool,
}

impl<H: Hal> Rfm69<H> {
    /// Create a driver over the given HAL. `high_power` selects the
    /// RFM69HW PA_BOOST output path and is fixed for the module's lifetime.
    pub fn new(hal: H, high_power: bool) -> Self {
        Self {
            hal,
            high_power,
            listen_mode_active: false,
        }
    }

    /// Whether the discontinuous listen mode is currently enabled
    pub fn listen_mode_active(&self) -> bool {
        self.listen_mode_active
    }

    /// Pulse the reset line and give the chip time to come back up
    pub fn reset(&mut self) -> Result<(), Rfm69Error> {
        self.hal.set_reset(true)?;
        std::thread::sleep(Duration::from_millis(1));
        self.hal.set_reset(false)?;
        std::thread::sleep(Duration::from_millis(10));
        self.listen_mode_active = false;
        Ok(())
    }

    /// Apply the base RF configuration and the OCP setting for the
    /// module's PA class.
    pub fn init(&mut self) -> Result<(), Rfm69Error> {
        self.apply_config(&BASE_CONFIG)?;

        // Overcurrent protection must be off to reach +20 dBm on high
        // power modules, and on otherwise
        let ocp = if self.high_power {
            RF_OCP_TRIM
        } else {
            RF_OCP_TRIM | RF_OCP_ON
        };
        self.write_register(REG_OCP, ocp)?;

        debug!("RFM69 base configuration applied");
        Ok(())
    }

    // =========================================================================
    // Bus transport
    // =========================================================================

    /// Run a bus transaction with chip select guaranteed to be released,
    /// including when the transfer itself fails.
    fn with_selected<T>(
        &mut self,
        op: impl FnOnce(&mut H) -> Result<T, HalError>,
    ) -> Result<T, Rfm69Error> {
        self.hal.select()?;
        let result = op(&mut self.hal);
        let released = self.hal.deselect();
        let value = result?;
        released?;
        Ok(value)
    }

    /// Write one register: address with the write flag set, then the value
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Rfm69Error> {
        self.with_selected(|hal| hal.write(&[reg | RF_SPI_WRITE_FLAG, value]))
    }

    /// Read one register: address with the write flag clear, one dummy byte
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Rfm69Error> {
        self.with_selected(|hal| {
            let tx = [reg & !RF_SPI_WRITE_FLAG, 0];
            let mut rx = [0u8; 2];
            hal.transfer(&tx, &mut rx)?;
            Ok(rx[1])
        })
    }

    // =========================================================================
    // Register config applier
    // =========================================================================

    /// Apply an ordered register configuration.
    ///
    /// Entries are written strictly in order with no rollback: if entry k
    /// fails, entries 0..k-1 have already taken effect on the device.
    /// Callers needing a known state must re-apply a full config.
    pub fn apply_config(&mut self, config: &[(u8, u8)]) -> Result<(), Rfm69Error> {
        for &(reg, value) in config {
            self.write_register(reg, value)?;
        }
        Ok(())
    }

    // =========================================================================
    // Mode state machine
    // =========================================================================

    /// Read the current operating mode from the hardware
    pub fn read_mode(&mut self) -> Result<RadioMode, Rfm69Error> {
        let raw = (self.read_register(REG_OPMODE)? >> RF_OPMODE_SHIFT) & RF_OPMODE_MASK;
        RadioMode::from_raw(raw)
    }

    /// Switch operating mode. Requesting the currently-read mode is a
    /// no-op with zero bus writes.
    pub fn set_mode(&mut self, mode: RadioMode) -> Result<(), Rfm69Error> {
        if self.read_mode()? == mode {
            return Ok(());
        }
        self.write_register(REG_OPMODE, mode.opmode_bits())
    }

    /// Poll RegIrqFlags1.ModeReady until set or the deadline elapses
    pub fn wait_for_mode_ready(&mut self, timeout: Duration) -> Result<(), Rfm69Error> {
        self.wait_for_flag(REG_IRQFLAGS1, RF_IRQFLAGS1_MODEREADY, timeout, "mode ready")
    }

    /// Poll RegIrqFlags2.PacketSent until set or the deadline elapses
    pub fn wait_for_packet_sent(&mut self, timeout: Duration) -> Result<(), Rfm69Error> {
        self.wait_for_flag(REG_IRQFLAGS2, RF_IRQFLAGS2_PACKETSENT, timeout, "packet sent")
    }

    fn wait_for_flag(
        &mut self,
        reg: u8,
        flag: u8,
        timeout: Duration,
        what: &'static str,
    ) -> Result<(), Rfm69Error> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.read_register(reg)? & flag != 0 {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Rfm69Error::Timeout(what));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// The hardware offers no abort primitive for a stuck transition, so a
    /// timed-out wait is logged and treated as best-effort completion.
    fn tolerate_timeout(result: Result<(), Rfm69Error>) -> Result<(), Rfm69Error> {
        match result {
            Err(Rfm69Error::Timeout(what)) => {
                warn!("wait for {what} timed out, continuing");
                Ok(())
            }
            other => other,
        }
    }

    // =========================================================================
    // Listen mode
    // =========================================================================

    /// Enable the discontinuous listen mode: the radio cycles between a
    /// low-power idle phase and a brief receive phase, trading receive
    /// latency for multi-week battery life.
    pub fn enable_listen_mode(
        &mut self,
        idle: ListenTiming,
        rx: ListenTiming,
    ) -> Result<(), Rfm69Error> {
        let listen1 = RF_LISTEN1_END_RESUME
            | (rx.resolution as u8) << RF_LISTEN1_RESOL_RX_SHIFT
            | (idle.resolution as u8) << RF_LISTEN1_RESOL_IDLE_SHIFT;

        // Order matters: ListenOn goes in with standby first, then the
        // timings, then the wake-up threshold and the fixed RX timeouts.
        let config = [
            (REG_OPMODE, RF_OPMODE_LISTEN_ON | RadioMode::Standby.opmode_bits()),
            (REG_LISTEN1, listen1),
            (REG_LISTEN2, idle.coef),
            (REG_LISTEN3, rx.coef),
            (REG_RSSITHRESH, RF_LISTEN_RSSI_THRESHOLD),
            (REG_RXTIMEOUT1, RF_LISTEN_RX_TIMEOUT),
            (REG_RXTIMEOUT2, RF_LISTEN_RX_TIMEOUT),
        ];
        self.apply_config(&config)?;

        self.listen_mode_active = true;
        debug!("listen mode enabled");
        Ok(())
    }

    /// Disable listen mode and restore the given operating mode.
    ///
    /// The abort sequence is stateful: ListenAbort must be written together
    /// with the target mode, then the target mode alone. Both writes are one
    /// named operation here so no caller can omit the abort step. The
    /// listen flag is cleared unconditionally afterward.
    pub fn disable_listen_mode(&mut self, restore: RadioMode) -> Result<(), Rfm69Error> {
        let result = self
            .write_register(REG_OPMODE, RF_OPMODE_LISTEN_ABORT | restore.opmode_bits())
            .and_then(|()| self.write_register(REG_OPMODE, restore.opmode_bits()));

        self.listen_mode_active = false;
        if result.is_ok() {
            debug!("listen mode disabled, restored {restore:?}");
        }
        result
    }

    // =========================================================================
    // Output power
    // =========================================================================

    /// Set the output power, rejecting out-of-range requests before any
    /// register write. See [`crate::radio::power`] for the segment table.
    pub fn set_power_dbm(&mut self, dbm: i8) -> Result<(), Rfm69Error> {
        let config = pa_config(dbm, self.high_power)?;

        self.write_register(REG_PALEVEL, config.pa_level)?;
        if let Some((test_pa1, test_pa2)) = config.test_pa {
            self.write_register(REG_TESTPA1, test_pa1)?;
            self.write_register(REG_TESTPA2, test_pa2)?;
        }

        debug!("output power set to {dbm} dBm");
        Ok(())
    }

    // =========================================================================
    // Message framer
    // =========================================================================

    /// Transmit one payload and leave the radio asleep.
    ///
    /// An empty payload clears the FIFO and returns without filling it or
    /// entering transmit; an empty transmission is meaningless for a
    /// fixed-length-payload protocol.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Rfm69Error> {
        self.set_mode(RadioMode::Standby)?;
        Self::tolerate_timeout(self.wait_for_mode_ready(WAIT_TIMEOUT))?;

        // Flush any stale FIFO content
        self.write_register(REG_IRQFLAGS2, RF_IRQFLAGS2_FIFOOVERRUN)?;

        if payload.is_empty() {
            return Ok(());
        }

        // Burst-write the payload into the FIFO in one chip select scope
        self.with_selected(|hal| {
            hal.write(&[REG_FIFO | RF_SPI_WRITE_FLAG])?;
            hal.write(payload)
        })?;

        self.set_mode(RadioMode::Transmit)?;
        Self::tolerate_timeout(self.wait_for_packet_sent(WAIT_TIMEOUT))?;

        // Power down between transmissions
        self.set_mode(RadioMode::Sleep)?;
        Self::tolerate_timeout(self.wait_for_mode_ready(WAIT_TIMEOUT))?;
        Ok(())
    }

    /// Drain a pending payload from the FIFO into `buf`, returning the
    /// number of bytes read (0 when nothing is pending).
    ///
    /// Outside listen mode the radio is moved to RX first and back to RX
    /// afterwards. While listen mode is active the hardware's own
    /// idle/receive sequencing already implies a payload triggered the
    /// wake-up, so the PayloadReady check is bypassed and no RX mode
    /// transition is issued.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Rfm69Error> {
        if self.read_mode()? != RadioMode::Receive && !self.listen_mode_active {
            self.set_mode(RadioMode::Receive)?;
            Self::tolerate_timeout(self.wait_for_mode_ready(WAIT_TIMEOUT))?;
        }

        let payload_ready =
            self.read_register(REG_IRQFLAGS2)? & RF_IRQFLAGS2_PAYLOADREADY != 0;
        if !payload_ready && !self.listen_mode_active {
            return Ok(0);
        }

        debug!("payload ready, draining FIFO");
        self.set_mode(RadioMode::Standby)?;

        let mut bytes_read = 0;
        while bytes_read < buf.len()
            && self.read_register(REG_IRQFLAGS2)? & RF_IRQFLAGS2_FIFONOTEMPTY != 0
        {
            buf[bytes_read] = self.read_register(REG_FIFO)?;
            bytes_read += 1;
        }

        if !self.listen_mode_active {
            self.set_mode(RadioMode::Receive)?;
            Self::tolerate_timeout(self.wait_for_mode_ready(WAIT_TIMEOUT))?;
        }

        Ok(bytes_read)
    }

    // =========================================================================
    // DIO mapping
    // =========================================================================

    /// Remap the DIO0 done-signal pin
    pub fn set_dio0_mapping(&mut self, mapping: Dio0Mapping) -> Result<(), Rfm69Error> {
        self.write_register(REG_DIOMAPPING1, (mapping as u8) << 6)
    }
}
