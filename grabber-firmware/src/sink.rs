//! Status sink forwarding controller events to defmt

use defmt::{error, info, warn, Display2Format};
use grabber_core::traits::{StatusEvent, StatusSink};

/// Logs every status event over RTT
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

impl StatusSink for DefmtSink {
    fn report(&mut self, event: StatusEvent) {
        match event {
            StatusEvent::ConnectionFailed(_)
            | StatusEvent::MoveTimedOut(_)
            | StatusEvent::AxisFaulted(_) => error!("{}", Display2Format(&event)),
            StatusEvent::Rezeroed(_) => warn!("{}", Display2Format(&event)),
            _ => info!("{}", Display2Format(&event)),
        }
    }
}
