//! Start button and ready LED task
//!
//! Debounces the start button and forwards presses to the controller. The
//! LED mirrors whether the trigger is currently enabled.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Output};
use embassy_time::Timer;

use crate::channels::{TRIGGER, TRIGGER_ENABLED};

/// Time the button must stay pressed to count
const DEBOUNCE_MS: u64 = 20;

/// Button task
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>, mut led: Output<'static>) {
    info!("Button task started");

    led.set_low();

    loop {
        match select(button.wait_for_falling_edge(), TRIGGER_ENABLED.wait()).await {
            Either::First(()) => {
                Timer::after_millis(DEBOUNCE_MS).await;
                if button.is_low() {
                    debug!("Start button pressed");
                    TRIGGER.signal(());
                    button.wait_for_high().await;
                }
            }
            Either::Second(enabled) => {
                led.set_level(if enabled { Level::High } else { Level::Low });
            }
        }
    }
}
