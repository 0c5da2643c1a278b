//! Visual signalling
//!
//! Two LEDs report battery health and message reception. The control loop
//! owns no indicator state; it only asks for the three operations below.

use crate::error::DoorbellError;

/// Indicator collaborator driven by the control loop
pub trait Indicator {
    /// Light the battery-health indicator: green above the low-voltage
    /// threshold, red below it
    fn show_battery_status(&mut self);

    /// Turn all indicators off
    fn clear(&mut self);

    /// Blocking multi-cycle blink pattern acknowledging a received
    /// doorbell code
    fn acknowledge_receive(&mut self);
}

/// Color of the battery-health indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryColor {
    Green,
    Red,
}

/// Pick the indicator color for a battery sample: green at or above the
/// configured low-voltage threshold, red below it. An unknown battery
/// state also reads as red.
pub fn battery_color(sample: Result<f32, DoorbellError>, low_voltage: f32) -> BatteryColor {
    match sample {
        Ok(volts) if volts >= low_voltage => BatteryColor::Green,
        _ => BatteryColor::Red,
    }
}

#[cfg(feature = "raspberry-pi")]
pub use gpio::GpioIndicator;

#[cfg(feature = "raspberry-pi")]
mod gpio {
    use std::thread;
    use std::time::Duration;

    use log::warn;
    use rppal::gpio::OutputPin;

    use super::*;
    use crate::doorbell::battery::BatteryMonitor;

    /// Green/red LED pair on GPIO outputs, colored by battery voltage
    /// against the configured low-voltage threshold
    pub struct GpioIndicator<B: BatteryMonitor> {
        green: OutputPin,
        red: OutputPin,
        battery: B,
        low_voltage: f32,
    }

    impl<B: BatteryMonitor> GpioIndicator<B> {
        pub fn new(green: OutputPin, red: OutputPin, battery: B, low_voltage: f32) -> Self {
            Self {
                green,
                red,
                battery,
                low_voltage,
            }
        }
    }

    impl<B: BatteryMonitor> Indicator for GpioIndicator<B> {
        fn show_battery_status(&mut self) {
            let sample = self.battery.sample_voltage();
            if let Err(e) = &sample {
                warn!("battery sample for indicator failed: {e}");
            }
            match battery_color(sample, self.low_voltage) {
                BatteryColor::Green => self.green.set_high(),
                BatteryColor::Red => self.red.set_high(),
            }
        }

        fn clear(&mut self) {
            self.green.set_low();
            self.red.set_low();
        }

        fn acknowledge_receive(&mut self) {
            for _ in 0..3 {
                for _ in 0..3 {
                    self.show_battery_status();
                    thread::sleep(Duration::from_millis(300));
                    self.clear();
                    thread::sleep(Duration::from_millis(100));
                }
                thread::sleep(Duration::from_millis(500));
            }
        }
    }
}
