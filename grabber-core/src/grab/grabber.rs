//! Pneumatic gripper valve pair
//!
//! The gripper has one valve that opens it and one that closes it. Exactly
//! one of them is energized once a toggle has settled; the gripper state is
//! implied by which one.

use embedded_hal_async::delay::DelayNs;

use super::cycle::GripState;
use crate::config::GrabberConfig;
use crate::traits::{ActuatorError, StatusEvent, StatusSink, ValveOutput};

/// Valve pair driving the gripper
pub struct Grabber<V> {
    valve_open: V,
    valve_closed: V,
    config: GrabberConfig,
}

impl<V: ValveOutput> Grabber<V> {
    pub fn new(valve_open: V, valve_closed: V, config: GrabberConfig) -> Self {
        Self {
            valve_open,
            valve_closed,
            config,
        }
    }

    /// Get configuration reference
    pub fn config(&self) -> &GrabberConfig {
        &self.config
    }

    /// Drive the valves for `state` without waiting
    ///
    /// The valve being released is switched off first so the pair is never
    /// energized together.
    pub fn set(&mut self, state: GripState) -> Result<(), ActuatorError> {
        let (on, off) = match state {
            GripState::Closed => (&mut self.valve_closed, &mut self.valve_open),
            GripState::Open => (&mut self.valve_open, &mut self.valve_closed),
        };

        off.set_level(self.config.off_level)?;
        on.set_level(self.config.on_level)
    }

    /// Open or close the gripper and wait for the pneumatics to settle
    pub async fn toggle<D: DelayNs, S: StatusSink>(
        &mut self,
        close: bool,
        delay: &mut D,
        sink: &mut S,
    ) -> Result<(), ActuatorError> {
        let state = if close {
            sink.report(StatusEvent::GripperClosing);
            GripState::Closed
        } else {
            sink.report(StatusEvent::GripperOpening);
            GripState::Open
        };

        self.set(state)?;
        delay.delay_ms(self.config.settle_ms).await;
        Ok(())
    }
}
