//! Encoder pulse counting task
//!
//! Counts rising edges on one encoder channel. The axis driver resets the
//! count at the start of every move and compares it against the commanded
//! distance.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::{AtomicU32, Ordering};

/// Encoder task, one instance per axis
#[embassy_executor::task(pool_size = 2)]
pub async fn encoder_task(mut pin: Input<'static>, pulses: &'static AtomicU32) {
    info!("Encoder task started");

    loop {
        pin.wait_for_rising_edge().await;
        pulses.fetch_add(1, Ordering::Relaxed);
    }
}
