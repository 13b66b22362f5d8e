//! Safety monitoring
//!
//! Bounds every supervising loop so a jammed axis surfaces as a fault
//! instead of hanging the controller.

pub mod watchdog;

pub use watchdog::{MoveWatchdog, WatchdogStatus};
