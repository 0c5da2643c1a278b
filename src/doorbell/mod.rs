//! Doorbell application layer: the control loop and its collaborators

pub mod battery;
pub mod config;
pub mod event;
pub mod indicator;
pub mod orchestrator;
pub mod system;

pub use battery::{BatteryMonitor, IioBatteryMonitor, CRITICAL_VOLTAGE, LOW_VOLTAGE};
pub use config::{DoorbellConfig, DOORBELL_CODE, SEND_DURATION_MS};
pub use event::{EventFlag, Events};
pub use indicator::{battery_color, BatteryColor, Indicator};
pub use orchestrator::{Doorbell, Step};
pub use system::{HostSystem, IrqControl, SystemControl};

#[cfg(feature = "raspberry-pi")]
pub use indicator::GpioIndicator;
#[cfg(feature = "raspberry-pi")]
pub use system::GpioEvents;
