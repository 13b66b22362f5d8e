//! Simulated hardware for unit tests
//!
//! A shared virtual clock advances only when the controller awaits a
//! delay; simulated axes integrate their motion against it lazily.

use core::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::traits::{ActuatorError, AxisDriver, AxisError, StatusEvent, StatusSink, ValveOutput};

/// Virtual time in microseconds
#[derive(Debug, Clone, Default)]
pub(crate) struct Clock {
    now_us: Rc<Cell<u64>>,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn now_us(&self) -> u64 {
        self.now_us.get()
    }

    fn advance_us(&self, us: u64) {
        self.now_us.set(self.now_us.get() + us);
    }
}

impl DelayNs for Clock {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance_us((ns as u64).div_ceil(1000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance_us(us as u64);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.advance_us(ms as u64 * 1000);
    }
}

/// Calls received by a simulated axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Command(u32, i32),
    Jog(i32),
    Stop,
}

/// How the simulated limit switch reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LimitMode {
    /// Pressed while the carriage sits at or below physical zero
    Physical,
    /// Always pressed
    Always,
    /// Never pressed
    Never,
}

/// Axis with real travel, a hard stop at zero and a switch there
#[derive(Debug)]
pub(crate) struct SimAxis {
    clock: Clock,
    last_us: u64,
    /// Carriage position in steps
    pub(crate) physical: i32,
    /// Travel rate while running
    pub(crate) steps_per_ms: u32,
    /// Signed travel direction in position space (0 = stopped)
    direction: i32,
    /// Steps left on a bounded move, `None` while jogging or idle
    remaining: Option<u32>,
    pub(crate) limit: LimitMode,
    /// Motor runs but the carriage does not move
    pub(crate) jammed: bool,
    /// Fail `poll_finished` with a link error
    pub(crate) fail_polls: bool,
    pub(crate) calls: Vec<Call>,
}

impl SimAxis {
    pub(crate) fn new(clock: &Clock, physical: i32) -> Self {
        Self {
            clock: clock.clone(),
            last_us: clock.now_us(),
            physical,
            steps_per_ms: 10,
            direction: 0,
            remaining: None,
            limit: LimitMode::Physical,
            jammed: false,
            fail_polls: false,
            calls: Vec::new(),
        }
    }

    /// Commands received, ignoring jogs and stops
    pub(crate) fn commands(&self) -> Vec<(u32, i32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Command(d, s) => Some((*d, *s)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.direction != 0
    }

    fn sync(&mut self) {
        let now = self.clock.now_us();
        let elapsed = now - self.last_us;
        self.last_us = now;

        if self.direction == 0 || self.jammed {
            return;
        }

        let mut steps = (elapsed * self.steps_per_ms as u64 / 1000).min(u32::MAX as u64) as u32;
        if let Some(remaining) = self.remaining {
            steps = steps.min(remaining);
        }

        let mut moved = 0;
        for _ in 0..steps {
            let next = self.physical + self.direction;
            if next < 0 {
                // Hard stop at the home end; encoder stops counting
                break;
            }
            self.physical = next;
            moved += 1;
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= moved;
        }
    }

    fn start(&mut self, speed: i32) -> Result<(), AxisError> {
        if speed == 0 {
            return Err(AxisError::InvalidSpeed);
        }
        // Negative speed drives away from home
        self.direction = if speed < 0 { 1 } else { -1 };
        Ok(())
    }
}

impl AxisDriver for SimAxis {
    fn command(&mut self, distance: u32, speed: i32) -> Result<(), AxisError> {
        self.sync();
        self.calls.push(Call::Command(distance, speed));
        self.start(speed)?;
        self.remaining = Some(distance);
        Ok(())
    }

    fn jog(&mut self, speed: i32) -> Result<(), AxisError> {
        self.sync();
        self.calls.push(Call::Jog(speed));
        self.start(speed)?;
        self.remaining = None;
        Ok(())
    }

    fn poll_limit(&mut self) -> Result<bool, AxisError> {
        self.sync();
        Ok(match self.limit {
            LimitMode::Physical => self.physical <= 0,
            LimitMode::Always => true,
            LimitMode::Never => false,
        })
    }

    fn poll_finished(&mut self) -> Result<bool, AxisError> {
        self.sync();
        if self.fail_polls {
            return Err(AxisError::Link);
        }
        Ok(self.remaining == Some(0))
    }

    fn stop(&mut self) -> Result<(), AxisError> {
        self.sync();
        self.calls.push(Call::Stop);
        self.direction = 0;
        Ok(())
    }
}

/// Valve output remembering every level it was set to
#[derive(Debug, Default)]
pub(crate) struct RecordingValve {
    pub(crate) level: u16,
    pub(crate) history: Vec<u16>,
    pub(crate) fail: bool,
}

impl ValveOutput for RecordingValve {
    fn set_level(&mut self, level: u16) -> Result<(), ActuatorError> {
        if self.fail {
            return Err(ActuatorError::Link);
        }
        self.level = level;
        self.history.push(level);
        Ok(())
    }
}

/// Sink collecting events in order
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) events: Vec<StatusEvent>,
}

impl RecordingSink {
    pub(crate) fn count(&self, event: StatusEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

impl StatusSink for RecordingSink {
    fn report(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}
