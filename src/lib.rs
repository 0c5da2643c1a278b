//! # doorbell-rs - Control Core for a Battery-Powered Wireless Doorbell
//!
//! The doorbell-rs crate drives a HopeRF RFM69 transceiver and runs the
//! application state machine of a battery-powered wireless doorbell: a
//! button press transmits a single-byte code for a fixed on-air window, a
//! matching received code triggers an acknowledgment blink, and the radio
//! spends the rest of its life in the duty-cycled listen mode that makes
//! multi-week battery operation possible.
//!
//! ## Features
//!
//! - Register-level RFM69 driver generic over a bus HAL (real SPI on
//!   Raspberry Pi, scripted mock for tests)
//! - Mode state machine with the hardware register as the source of truth
//! - Discontinuous listen mode with configurable idle/receive timing
//! - Piecewise output power mapping for standard and high power modules
//! - Cooperative single-threaded control loop with atomic event mailboxes
//! - Battery monitoring with a terminal low-battery shutdown
//!
//! ## Usage
//!
//! ```rust,no_run
//! use doorbell_rs::{
//!     Doorbell, DoorbellConfig, Events, HostSystem, Rfm69,
//! };
//! # use doorbell_rs::radio::hal::MockHal;
//! # use doorbell_rs::doorbell::{BatteryMonitor, Indicator, IrqControl};
//! # use doorbell_rs::DoorbellError;
//! # struct Batt; impl BatteryMonitor for Batt {
//! #     fn sample_voltage(&mut self) -> Result<f32, DoorbellError> { Ok(3.6) } }
//! # struct Leds; impl Indicator for Leds {
//! #     fn show_battery_status(&mut self) {}
//! #     fn clear(&mut self) {}
//! #     fn acknowledge_receive(&mut self) {} }
//! # struct Irq; impl IrqControl for Irq {
//! #     fn enable_radio_irq(&mut self) {}
//! #     fn disable_radio_irq(&mut self) {} }
//!
//! let config = DoorbellConfig::default();
//! let events = Events::new();
//! let radio = Rfm69::new(MockHal::new(), config.high_power);
//! let system = HostSystem::new(events.clone());
//!
//! let mut doorbell = Doorbell::new(radio, Batt, Leds, system, Irq, events, config);
//! doorbell.start()?;
//! doorbell.run();
//! # Ok::<(), doorbell_rs::DoorbellError>(())
//! ```

pub mod doorbell;
pub mod error;
pub mod logging;
pub mod radio;

pub use crate::error::DoorbellError;
pub use crate::logging::init_logger;

// Radio driver types
pub use radio::driver::{
    Dio0Mapping, ListenResolution, ListenTiming, RadioMode, Rfm69, Rfm69Error,
};
pub use radio::hal::{Hal, HalError, MockHal};
pub use radio::power::{pa_config, PaConfig};

// Application layer
pub use doorbell::{
    BatteryMonitor, Doorbell, DoorbellConfig, EventFlag, Events, HostSystem, Indicator,
    IrqControl, Step, SystemControl, DOORBELL_CODE,
};
