//! Session state machine
//!
//! Decides when homing may run and when the start trigger is live.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};
