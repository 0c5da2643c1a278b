//! # Doorbell Control Loop
//!
//! Single-threaded cooperative loop coordinating the radio driver with the
//! battery, indicator, interrupt, and power collaborators. Interrupt
//! context only raises the event mailboxes; everything else happens here,
//! so the transceiver handle needs no locking.
//!
//! Each awake iteration: handle a pending button press (transmit window),
//! handle a pending radio message (drain and acknowledge), sample the
//! battery, then either shut down for good, go back to sleep, or run
//! another iteration if a flag arrived meanwhile. Radio faults inside a
//! handling pass are logged and the loop continues with the radio in its
//! last-known state; there is no recovery path below a hardware reset.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::doorbell::battery::BatteryMonitor;
use crate::doorbell::config::DoorbellConfig;
use crate::doorbell::event::Events;
use crate::doorbell::indicator::Indicator;
use crate::doorbell::system::{IrqControl, SystemControl};
use crate::error::DoorbellError;
use crate::radio::driver::{Dio0Mapping, RadioMode, Rfm69, Rfm69Error};
use crate::radio::hal::Hal;

/// Outcome of one control loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Both flags were clear; the system slept and has just been woken
    Slept,
    /// At least one flag was still pending, loop again without sleeping
    Idle,
    /// Battery below the critical threshold; the loop is terminal
    Shutdown,
}

/// The doorbell application state machine
pub struct Doorbell<H, B, I, S, Q>
where
    H: Hal,
    B: BatteryMonitor,
    I: Indicator,
    S: SystemControl,
    Q: IrqControl,
{
    radio: Rfm69<H>,
    battery: B,
    indicator: I,
    system: S,
    irq: Q,
    events: Events,
    config: DoorbellConfig,
    sleeping: bool,
}

impl<H, B, I, S, Q> Doorbell<H, B, I, S, Q>
where
    H: Hal,
    B: BatteryMonitor,
    I: Indicator,
    S: SystemControl,
    Q: IrqControl,
{
    pub fn new(
        radio: Rfm69<H>,
        battery: B,
        indicator: I,
        system: S,
        irq: Q,
        events: Events,
        config: DoorbellConfig,
    ) -> Self {
        Self {
            radio,
            battery,
            indicator,
            system,
            irq,
            events,
            config,
            sleeping: false,
        }
    }

    /// Boot sequence: reset and configure the radio, arm listen mode, and
    /// take the first sleep. A power-level failure is logged but not
    /// fatal; the radio still transmits at its reset default.
    pub fn start(&mut self) -> Result<(), DoorbellError> {
        self.radio.reset()?;
        self.radio.init()?;

        if let Err(e) = self.radio.set_power_dbm(self.config.power_dbm) {
            error!("setting output power to {} dBm failed: {e}", self.config.power_dbm);
        }

        self.radio
            .enable_listen_mode(self.config.listen_idle, self.config.listen_rx)?;
        info!("radio initialized, listen mode armed");

        self.enter_sleep();
        Ok(())
    }

    /// Run the control loop until terminal shutdown
    pub fn run(&mut self) {
        loop {
            if self.run_once() == Step::Shutdown {
                return;
            }
        }
    }

    /// One loop iteration; see the module docs for the sequence
    pub fn run_once(&mut self) -> Step {
        if self.sleeping {
            self.system.wake();
            self.sleeping = false;
        }

        if self.events.button.is_raised() {
            if let Err(e) = self.handle_button() {
                error!("button handling failed: {e}");
            }
        }

        if self.events.message.is_raised() {
            if let Err(e) = self.handle_message() {
                error!("message handling failed: {e}");
            }
        }

        match self.battery.sample_voltage() {
            Ok(volts) => {
                debug!("battery voltage is {volts:.2} V");
                if volts < self.config.critical_voltage {
                    self.shutdown();
                    return Step::Shutdown;
                }
            }
            Err(e) => warn!("battery sample failed: {e}"),
        }

        if !self.events.any_raised() {
            self.enter_sleep();
            return Step::Slept;
        }
        Step::Idle
    }

    /// Transmit the doorbell code for the full on-air window.
    ///
    /// The indicator is cleared and the flag consumed even when the radio
    /// faults mid-window; listen mode and the DIO0 mapping are restored on
    /// every path so the receiver side keeps working.
    fn handle_button(&mut self) -> Result<(), Rfm69Error> {
        self.indicator.show_battery_status();

        let sent = self.transmit_window();

        self.indicator.clear();
        self.events.button.clear();

        let restored = self
            .radio
            .set_dio0_mapping(Dio0Mapping::RxPayloadReady)
            .and_then(|()| {
                self.radio
                    .enable_listen_mode(self.config.listen_idle, self.config.listen_rx)
            });

        sent.and(restored)
    }

    fn transmit_window(&mut self) -> Result<(), Rfm69Error> {
        // Listen mode off and DIO0 unmapped while we own the air
        self.radio.disable_listen_mode(RadioMode::Sleep)?;
        self.radio.set_dio0_mapping(Dio0Mapping::TxNone)?;

        info!("button pressed, transmitting code 0x{:02X}", self.config.code);

        let frame = [self.config.code];
        let deadline = Instant::now() + Duration::from_millis(self.config.send_duration_ms);
        while Instant::now() < deadline {
            self.radio.send(&frame)?;
        }
        Ok(())
    }

    /// Drain a received message and acknowledge a matching code.
    ///
    /// The radio interrupt line stays masked while the FIFO is drained so
    /// the drain itself cannot re-raise the message event.
    fn handle_message(&mut self) -> Result<(), Rfm69Error> {
        self.irq.disable_radio_irq();

        let mut buffer = [0u8; 1];
        let result = self.radio.receive(&mut buffer);
        match &result {
            Ok(0) => debug!("wake with no payload pending"),
            Ok(n) => {
                info!("received {n} byte(s): {:02X?}", &buffer[..*n]);
                if buffer[0] == self.config.code {
                    self.indicator.acknowledge_receive();
                }
            }
            Err(_) => {}
        }

        self.events.message.clear();
        self.irq.enable_radio_irq();
        result.map(|_| ())
    }

    /// Terminal low-battery shutdown; exited only by a hardware reset
    fn shutdown(&mut self) {
        warn!("not enough battery to continue, shutting down");
        if let Err(e) = self.radio.disable_listen_mode(RadioMode::Sleep) {
            error!("stopping the radio failed: {e}");
        }
        self.system.shutdown();
    }

    fn enter_sleep(&mut self) {
        self.sleeping = true;
        self.system.sleep_until_event();
    }

    /// The radio driver, for inspection after the loop stops
    pub fn radio(&self) -> &Rfm69<H> {
        &self.radio
    }
}
