//! Valve output trait
//!
//! A valve output is one solenoid channel driven at a level. The gripper
//! uses two of them: one to open, one to close.

/// Errors that can occur when driving a valve output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Communication with the output stage failed
    Link,
    /// Requested level is outside the output range
    InvalidLevel,
}

impl core::fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActuatorError::Link => f.write_str("valve link failure"),
            ActuatorError::InvalidLevel => f.write_str("invalid valve level"),
        }
    }
}

/// Trait for a level-driven valve output
pub trait ValveOutput {
    /// Drive the output at `level` (0 = de-energized)
    fn set_level(&mut self, level: u16) -> Result<(), ActuatorError>;
}

impl<T: ValveOutput + ?Sized> ValveOutput for &mut T {
    fn set_level(&mut self, level: u16) -> Result<(), ActuatorError> {
        (**self).set_level(level)
    }
}
