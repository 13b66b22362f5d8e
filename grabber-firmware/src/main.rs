//! Pneumatic grabber firmware
//!
//! Main firmware binary for the RP2040-based grabber controller: two DC
//! axes with encoders and home switches, a two-valve pneumatic gripper and
//! one start button.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use {defmt_rtt as _, panic_probe as _};

use grabber_core::config::MachineConfig;

use crate::board::{AxisPins, BoardLink, EncoderCount, PWM_TOP};
use crate::channels::{X_PULSES, Z_PULSES};

mod board;
mod channels;
mod sink;
mod tasks;

/// Configuration validated and serialized by build.rs from machine.toml
static MACHINE_BIN: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/machine.bin"));

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Grabber firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Motor and valve PWM, all channels start at 0% duty
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_TOP;

    let motors = Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, pwm_config.clone());
    let (x_motor, z_motor) = motors.split();
    let valves = Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, pwm_config);
    let (valve_open, valve_closed) = valves.split();

    info!("PWM initialized");

    let link = BoardLink {
        x: AxisPins {
            motor: unwrap!(x_motor),
            dir: Output::new(p.PIN_6, Level::Low),
            limit: Input::new(p.PIN_8, Pull::Up),
            counter: EncoderCount::new(&X_PULSES),
        },
        z: AxisPins {
            motor: unwrap!(z_motor),
            dir: Output::new(p.PIN_7, Level::Low),
            limit: Input::new(p.PIN_9, Pull::Up),
            counter: EncoderCount::new(&Z_PULSES),
        },
        valve_open: unwrap!(valve_open),
        valve_closed: unwrap!(valve_closed),
        fault: Input::new(p.PIN_13, Pull::Up),
    };

    let x_encoder = Input::new(p.PIN_10, Pull::None);
    let z_encoder = Input::new(p.PIN_11, Pull::None);
    let button = Input::new(p.PIN_12, Pull::Up);
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks
    spawner.spawn(tasks::encoder_task(x_encoder, &X_PULSES)).unwrap();
    spawner.spawn(tasks::encoder_task(z_encoder, &Z_PULSES)).unwrap();
    spawner.spawn(tasks::button_task(button, led)).unwrap();
    spawner.spawn(tasks::controller_task(link, config)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Decode the embedded configuration
///
/// build.rs has already validated it; defaults are only used if the bytes
/// are somehow unreadable.
fn load_config() -> MachineConfig {
    match postcard::from_bytes::<MachineConfig>(MACHINE_BIN) {
        Ok(config) => {
            info!(
                "Loaded configuration: {} steps x {}",
                config.cycle.steps.len(),
                config.cycle.repeat_count
            );
            config
        }
        Err(_) => {
            error!("Embedded configuration unreadable, using defaults");
            MachineConfig::default()
        }
    }
}
