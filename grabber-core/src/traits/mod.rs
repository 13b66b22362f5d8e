//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod axis;
pub mod link;
pub mod status;
pub mod valve;

pub use axis::{AxisDriver, AxisError};
pub use link::{ConnectionError, Hardware, HardwareLink};
pub use status::{StatusEvent, StatusSink};
pub use valve::{ActuatorError, ValveOutput};
