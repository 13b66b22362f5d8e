//! Board-agnostic core logic for the pneumatic grabber
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (axis driver, valve output, status sink)
//! - Dual-axis motion controller with homing and limit re-zeroing
//! - Grab cycle sequencer and gripper valve pair
//! - Session state machine gating the start trigger
//! - Move watchdog bounding every supervising loop
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod grab;
pub mod motion;
pub mod safety;
pub mod session;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;

pub use session::{Session, SessionError};
