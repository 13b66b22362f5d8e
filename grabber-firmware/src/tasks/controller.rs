//! Main controller task
//!
//! Owns the session. Homes once at start-up, then runs one grab cycle per
//! start button press. After a stall or fault the next press re-homes.

use defmt::*;
use embassy_time::{Delay, Timer};

use grabber_core::config::MachineConfig;
use grabber_core::state::State;
use grabber_core::Session;

use crate::board::{BoardAxis, BoardLink, BoardValve};
use crate::channels::{TRIGGER, TRIGGER_ENABLED};
use crate::sink::DefmtSink;

type BoardSession = Session<BoardAxis, BoardAxis, BoardValve, Delay, DefmtSink>;

/// Controller task - connects the hardware and serves the start button
#[embassy_executor::task]
pub async fn controller_task(link: BoardLink, config: MachineConfig) {
    info!("Controller task started");

    let mut session: BoardSession = match Session::open(link, Delay, DefmtSink, config) {
        Ok(session) => session,
        Err(e) => {
            error!("{}", Display2Format(&e));
            park().await
        }
    };

    loop {
        match session.state() {
            State::Boot => {
                if let Err(e) = session.home().await {
                    error!("{}", Display2Format(&e));
                }
            }
            State::Ready => {
                TRIGGER_ENABLED.signal(true);
                wait_for_press().await;
                TRIGGER_ENABLED.signal(false);

                match session.trigger().await {
                    Ok(position) => info!("Cycle finished at ({}, {})", position.x, position.z),
                    Err(e) => error!("{}", Display2Format(&e)),
                }
            }
            State::Error(kind) if kind.is_recoverable() => {
                warn!("Stopped after {:?}; press start to re-home", kind);
                wait_for_press().await;
                if let Err(e) = session.home().await {
                    error!("{}", Display2Format(&e));
                }
            }
            State::Error(kind) => {
                error!("Unrecoverable error {:?}", kind);
                park().await
            }
            State::Homing | State::Cycling => {
                // Only observable while an operation is awaited above
                Timer::after_millis(10).await;
            }
        }
    }
}

/// Wait for a fresh press, dropping any made while busy
async fn wait_for_press() {
    TRIGGER.reset();
    TRIGGER.wait().await;
}

/// Static error state; the button stays disabled
async fn park() -> ! {
    TRIGGER_ENABLED.signal(false);
    loop {
        Timer::after_secs(60).await;
    }
}
