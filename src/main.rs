use std::path::PathBuf;

use clap::{Parser, Subcommand};
use doorbell_rs::{init_logger, DoorbellConfig, DoorbellError};

#[derive(Parser)]
#[command(name = "doorbell")]
#[command(about = "Wireless doorbell control core (RFM69)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the doorbell control loop on real hardware
    Run {
        /// JSON configuration file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    DefaultConfig,
}

fn main() -> Result<(), DoorbellError> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config } => {
            let config = match config {
                Some(path) => DoorbellConfig::load(&path)?,
                None => DoorbellConfig::default(),
            };
            run(config)
        }
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&DoorbellConfig::default())?);
            Ok(())
        }
    }
}

#[cfg(feature = "raspberry-pi")]
fn run(config: DoorbellConfig) -> Result<(), DoorbellError> {
    use doorbell_rs::doorbell::{Doorbell, Events, GpioEvents, GpioIndicator, HostSystem};
    use doorbell_rs::doorbell::battery::IioBatteryMonitor;
    use doorbell_rs::radio::hal::raspberry_pi::{GpioPins, RaspberryPiHal};
    use doorbell_rs::Rfm69;
    use log::info;
    use rppal::gpio::Gpio;

    let pins = GpioPins {
        cs: config.cs_pin,
        reset: config.reset_pin,
    };
    let hal = RaspberryPiHal::new(config.spi_bus, &pins)
        .map_err(|e| DoorbellError::Config(format!("HAL init failed: {e}")))?;
    let radio = Rfm69::new(hal, config.high_power);

    let gpio = Gpio::new().map_err(|e| DoorbellError::Config(format!("GPIO init failed: {e}")))?;
    let map_gpio_err = |e: rppal::gpio::Error| DoorbellError::Config(format!("GPIO pin: {e}"));

    let battery = IioBatteryMonitor::new(
        config.battery_adc_path.clone(),
        config.battery_volts_per_count,
    );
    let indicator_battery = IioBatteryMonitor::new(
        config.battery_adc_path.clone(),
        config.battery_volts_per_count,
    );
    let indicator = GpioIndicator::new(
        gpio.get(config.green_led_pin).map_err(map_gpio_err)?.into_output(),
        gpio.get(config.red_led_pin).map_err(map_gpio_err)?.into_output(),
        indicator_battery,
        config.low_voltage,
    );

    let events = Events::new();
    let irq = GpioEvents::new(
        gpio.get(config.dio0_pin).map_err(map_gpio_err)?.into_input(),
        gpio.get(config.button_pin).map_err(map_gpio_err)?.into_input_pullup(),
        events.clone(),
    )
    .map_err(map_gpio_err)?;
    let system = HostSystem::new(events.clone());

    let mut doorbell = Doorbell::new(radio, battery, indicator, system, irq, events, config);
    doorbell.start()?;
    info!("doorbell running");
    doorbell.run();
    info!("doorbell stopped");
    Ok(())
}

#[cfg(not(feature = "raspberry-pi"))]
fn run(_config: DoorbellConfig) -> Result<(), DoorbellError> {
    Err(DoorbellError::FeatureNotEnabled(
        "raspberry-pi feature required to drive hardware; build with --features raspberry-pi",
    ))
}
