//! Mock HAL implementation for testing
//!
//! Simulates enough of the RFM69 register file and FIFO for the driver and
//! the doorbell loop to be tested without hardware. The mock parses SPI
//! transactions the way the chip does: the first byte after chip select is
//! the address byte, every following byte in the same transaction is burst
//! data for that address.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::radio::hal::{Hal, HalError};
use crate::radio::registers::*;

/// Simulated radio state behind the mock
#[derive(Debug)]
pub struct MockRadio {
    /// Register file (addresses 0x00..0x7F)
    pub regs: [u8; 0x80],
    /// Bytes queued for the receive FIFO
    pub rx_fifo: VecDeque<u8>,
    /// Bytes the driver has pushed into the transmit FIFO
    pub tx_fifo: Vec<u8>,
    /// Payloads "sent over the air": FIFO content captured on each TX entry
    pub transmitted: Vec<Vec<u8>>,
    /// Log of register writes as (addr, value), FIFO bytes excluded
    pub writes: Vec<(u8, u8)>,
    /// Every value written to RegOpMode, in order
    pub mode_history: Vec<u8>,
    /// Number of FIFO flushes (FifoOverrun bit written)
    pub fifo_flushes: u32,
    /// Reset line transitions
    pub reset_pulses: Vec<bool>,

    /// ModeReady flag state
    pub mode_ready: bool,
    /// PayloadReady flag state
    pub payload_ready: bool,
    /// PacketSent flag state
    pub packet_sent: bool,

    /// Whether ModeReady raises after a mode write (clear to simulate a
    /// stuck mode transition)
    pub mode_ready_on_switch: bool,
    /// Whether PacketSent raises on TX entry
    pub packet_sent_on_tx: bool,
    /// Fail the Nth register write (0-based) with an SPI error
    pub fail_register_write_at: Option<usize>,

    selected: bool,
    burst_addr: Option<u8>,
}

impl Default for MockRadio {
    fn default() -> Self {
        let mut regs = [0u8; 0x80];
        // Power-on state: standby mode, oscillator running
        regs[REG_OPMODE as usize] = 0x04;
        Self {
            regs,
            rx_fifo: VecDeque::new(),
            tx_fifo: Vec::new(),
            transmitted: Vec::new(),
            writes: Vec::new(),
            mode_history: Vec::new(),
            fifo_flushes: 0,
            reset_pulses: Vec::new(),
            mode_ready: true,
            payload_ready: false,
            packet_sent: false,
            mode_ready_on_switch: true,
            packet_sent_on_tx: true,
            fail_register_write_at: None,
            selected: false,
            burst_addr: None,
        }
    }
}

impl MockRadio {
    fn apply_write(&mut self, addr: u8, value: u8) -> Result<(), HalError> {
        if addr == REG_FIFO {
            self.tx_fifo.push(value);
            return Ok(());
        }

        if let Some(n) = self.fail_register_write_at {
            if self.writes.len() == n {
                return Err(HalError::Spi("injected write failure".to_string()));
            }
        }
        self.writes.push((addr, value));

        match addr {
            REG_OPMODE => {
                self.regs[addr as usize] = value;
                self.mode_history.push(value);
                self.mode_ready = self.mode_ready_on_switch;
                let mode = (value >> RF_OPMODE_SHIFT) & RF_OPMODE_MASK;
                if mode == 3 {
                    // Entering TX drains the FIFO over the air
                    self.transmitted.push(std::mem::take(&mut self.tx_fifo));
                    self.packet_sent = self.packet_sent_on_tx;
                } else {
                    self.packet_sent = false;
                }
            }
            REG_IRQFLAGS2 => {
                if value & RF_IRQFLAGS2_FIFOOVERRUN != 0 {
                    self.fifo_flushes += 1;
                    self.tx_fifo.clear();
                    self.rx_fifo.clear();
                    self.payload_ready = false;
                }
            }
            _ => self.regs[addr as usize] = value,
        }
        Ok(())
    }

    fn read_value(&mut self, addr: u8) -> u8 {
        match addr {
            REG_FIFO => {
                let byte = self.rx_fifo.pop_front().unwrap_or(0);
                if self.rx_fifo.is_empty() {
                    self.payload_ready = false;
                }
                byte
            }
            REG_IRQFLAGS1 => {
                if self.mode_ready {
                    RF_IRQFLAGS1_MODEREADY
                } else {
                    0
                }
            }
            REG_IRQFLAGS2 => {
                let mut flags = 0;
                if self.payload_ready {
                    flags |= RF_IRQFLAGS2_PAYLOADREADY;
                }
                if self.packet_sent {
                    flags |= RF_IRQFLAGS2_PACKETSENT;
                }
                if !self.rx_fifo.is_empty() {
                    flags |= RF_IRQFLAGS2_FIFONOTEMPTY;
                }
                flags
            }
            _ => self.regs[addr as usize],
        }
    }
}

/// Cloneable handle over the shared mock radio state
#[derive(Clone, Default)]
pub struct MockHal {
    inner: Arc<Mutex<MockRadio>>,
}

impl MockHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the simulated radio for setup and assertions
    pub fn radio(&self) -> MutexGuard<'_, MockRadio> {
        self.inner.lock().unwrap()
    }

    /// Queue bytes into the receive FIFO and raise PayloadReady
    pub fn queue_rx_payload(&self, data: &[u8]) {
        let mut radio = self.radio();
        radio.rx_fifo.extend(data);
        radio.payload_ready = true;
    }

    /// Current 3-bit operating mode field
    pub fn mode(&self) -> u8 {
        (self.radio().regs[REG_OPMODE as usize] >> RF_OPMODE_SHIFT) & RF_OPMODE_MASK
    }

    /// Number of register writes seen so far (FIFO bytes excluded)
    pub fn write_count(&self) -> usize {
        self.radio().writes.len()
    }

    /// All values written to the given register, in order
    pub fn writes_to(&self, addr: u8) -> Vec<u8> {
        self.radio()
            .writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Whether chip select is currently asserted
    pub fn is_selected(&self) -> bool {
        self.radio().selected
    }
}

impl Hal for MockHal {
    fn select(&mut self) -> Result<(), HalError> {
        let mut radio = self.radio();
        radio.selected = true;
        radio.burst_addr = None;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), HalError> {
        let mut radio = self.radio();
        radio.selected = false;
        radio.burst_addr = None;
        Ok(())
    }

    fn write(&mut self, tx: &[u8]) -> Result<(), HalError> {
        let mut radio = self.radio();
        if !radio.selected {
            return Err(HalError::Spi("write without chip select".to_string()));
        }
        for &byte in tx {
            match radio.burst_addr {
                None => radio.burst_addr = Some(byte & 0x7F),
                Some(addr) => radio.apply_write(addr, byte)?,
            }
        }
        Ok(())
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), HalError> {
        let mut radio = self.radio();
        if !radio.selected {
            return Err(HalError::Spi("transfer without chip select".to_string()));
        }
        for (i, &byte) in tx.iter().enumerate() {
            let received = match radio.burst_addr {
                None => {
                    radio.burst_addr = Some(byte & 0x7F);
                    0
                }
                Some(addr) => radio.read_value(addr),
            };
            if let Some(slot) = rx.get_mut(i) {
                *slot = received;
            }
        }
        Ok(())
    }

    fn set_reset(&mut self, level: bool) -> Result<(), HalError> {
        self.radio().reset_pulses.push(level);
        Ok(())
    }
}
