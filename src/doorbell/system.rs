//! Power, clock, and interrupt-line collaborators
//!
//! On the reference hardware these map to MCU STOP/STANDBY modes, clock
//! reconfiguration on wake, and NVIC line masking. Hosted implementations
//! approximate them: sleeping parks the process until an event flag is
//! raised, shutdown just marks the loop terminal.

use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::doorbell::event::Events;

/// Low-power sleep/wake/shutdown collaborator
pub trait SystemControl {
    /// Enter low-power sleep until an external event arrives. Returns when
    /// the wake condition fires.
    fn sleep_until_event(&mut self);

    /// Restore full-speed operation after a wake (clock reconfiguration on
    /// real targets)
    fn wake(&mut self);

    /// Enter the terminal low-power shutdown. Only a hardware reset
    /// leaves this state; the control loop does not run again after it.
    fn shutdown(&mut self);
}

/// Enable/disable control over the radio's interrupt line
pub trait IrqControl {
    /// Unmask the radio DIO0 interrupt line
    fn enable_radio_irq(&mut self);

    /// Mask the radio DIO0 interrupt line so draining the FIFO cannot
    /// re-raise the message event mid-handling
    fn disable_radio_irq(&mut self);
}

/// Hosted stand-in for the MCU power modes: sleeping polls the event
/// mailboxes at a slow cadence instead of a WFI instruction.
pub struct HostSystem {
    events: Events,
    poll_interval: Duration,
}

impl HostSystem {
    pub fn new(events: Events) -> Self {
        Self {
            events,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl SystemControl for HostSystem {
    fn sleep_until_event(&mut self) {
        debug!("entering sleep");
        while !self.events.any_raised() {
            thread::sleep(self.poll_interval);
        }
    }

    fn wake(&mut self) {
        debug!("waking up");
    }

    fn shutdown(&mut self) {
        info!("entering terminal shutdown");
    }
}

#[cfg(feature = "raspberry-pi")]
pub use gpio::GpioEvents;

#[cfg(feature = "raspberry-pi")]
mod gpio {
    use log::{error, warn};
    use rppal::gpio::{InputPin, Trigger};

    use super::IrqControl;
    use crate::doorbell::event::Events;

    /// Wires the button and radio DIO0 input pins to the event mailboxes
    /// and exposes masking of the radio line.
    pub struct GpioEvents {
        dio0: InputPin,
        _button: InputPin,
        events: Events,
    }

    impl GpioEvents {
        /// Register edge interrupts on both pins. The callbacks only raise
        /// the mailboxes; all handling stays in the control loop.
        pub fn new(
            mut dio0: InputPin,
            mut button: InputPin,
            events: Events,
        ) -> Result<Self, rppal::gpio::Error> {
            let message = events.message.clone();
            dio0.set_async_interrupt(Trigger::RisingEdge, move |_| message.raise())?;

            let pressed = events.button.clone();
            button.set_async_interrupt(Trigger::FallingEdge, move |_| pressed.raise())?;

            Ok(Self {
                dio0,
                _button: button,
                events,
            })
        }
    }

    impl IrqControl for GpioEvents {
        fn enable_radio_irq(&mut self) {
            let message = self.events.message.clone();
            if let Err(e) = self
                .dio0
                .set_async_interrupt(Trigger::RisingEdge, move |_| message.raise())
            {
                error!("failed to re-enable radio interrupt: {e}");
            }
        }

        fn disable_radio_irq(&mut self) {
            if let Err(e) = self.dio0.clear_async_interrupt() {
                warn!("failed to mask radio interrupt: {e}");
            }
        }
    }
}
