//! RFM69 transceiver driver: HAL, register map, power calculation, and the
//! mode/listen/framing state machine

pub mod driver;
pub mod hal;
pub mod power;
pub mod registers;

pub use driver::{
    Dio0Mapping, ListenResolution, ListenTiming, RadioMode, Rfm69, Rfm69Error, WAIT_TIMEOUT,
};
pub use hal::{Hal, HalError, MockHal};
pub use power::{pa_config, PaConfig};
