//! Move watchdog
//!
//! Counts poll ticks for one supervising loop and reports expiry once the
//! budget derived from the configured timeout is used up.

/// Watchdog condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogStatus {
    /// Budget remaining
    Ok,
    /// Budget exhausted
    Expired,
}

/// Tick budget for one move or homing pass
#[derive(Debug, Clone)]
pub struct MoveWatchdog {
    /// Maximum number of ticks allowed
    budget_ticks: u32,
    /// Ticks consumed so far
    elapsed_ticks: u32,
}

impl MoveWatchdog {
    /// Create a watchdog allowing `budget_ticks` ticks
    pub fn new(budget_ticks: u32) -> Self {
        Self {
            budget_ticks,
            elapsed_ticks: 0,
        }
    }

    /// Create a watchdog from a wall-clock timeout and the poll interval
    ///
    /// Always allows at least one tick.
    pub fn from_timeout(timeout_ms: u32, poll_interval_us: u32) -> Self {
        let poll_us = poll_interval_us.max(1) as u64;
        let ticks = (timeout_ms as u64 * 1000).div_ceil(poll_us);
        Self::new(ticks.clamp(1, u32::MAX as u64) as u32)
    }

    /// Record one elapsed tick
    pub fn tick(&mut self) -> WatchdogStatus {
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        self.check()
    }

    /// Check the budget without consuming a tick
    pub fn check(&self) -> WatchdogStatus {
        if self.elapsed_ticks >= self.budget_ticks {
            WatchdogStatus::Expired
        } else {
            WatchdogStatus::Ok
        }
    }

    /// Ticks consumed so far
    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Total budget
    pub fn budget_ticks(&self) -> u32 {
        self.budget_ticks
    }
}
