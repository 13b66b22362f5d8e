//! Axis driver trait
//!
//! This trait abstracts over one incremental motor plus the home/limit
//! switch at the end of its travel. Implementations may talk to a local
//! H-bridge with an encoder, or to a remote I/O controller.

/// Errors that can occur with axis operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// Communication with the motor or switch failed
    Link,
    /// Motor driver reported a fault (overcurrent, undervoltage)
    DriverFault,
    /// Speed is zero or outside what the driver can produce
    InvalidSpeed,
}

impl core::fmt::Display for AxisError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AxisError::Link => f.write_str("axis link failure"),
            AxisError::DriverFault => f.write_str("motor driver fault"),
            AxisError::InvalidSpeed => f.write_str("invalid axis speed"),
        }
    }
}

/// Trait for a single incremental axis with a home/limit switch
///
/// Direction is carried by the sign of `speed`; distances are always
/// magnitudes. None of these operations are retried by the caller.
pub trait AxisDriver {
    /// Program a relative move of `distance` counts at `speed`
    ///
    /// The motion controller never calls this with `distance == 0`.
    fn command(&mut self, distance: u32, speed: i32) -> Result<(), AxisError>;

    /// Run at `speed` with no distance bound until [`stop`](Self::stop)
    fn jog(&mut self, speed: i32) -> Result<(), AxisError>;

    /// Check if the home/limit switch is pressed
    fn poll_limit(&mut self) -> Result<bool, AxisError>;

    /// Check if the last commanded relative move has completed
    fn poll_finished(&mut self) -> Result<bool, AxisError>;

    /// Halt motion immediately
    ///
    /// Must be safe to call on a stopped axis.
    fn stop(&mut self) -> Result<(), AxisError>;
}

impl<T: AxisDriver + ?Sized> AxisDriver for &mut T {
    fn command(&mut self, distance: u32, speed: i32) -> Result<(), AxisError> {
        (**self).command(distance, speed)
    }

    fn jog(&mut self, speed: i32) -> Result<(), AxisError> {
        (**self).jog(speed)
    }

    fn poll_limit(&mut self) -> Result<bool, AxisError> {
        (**self).poll_limit()
    }

    fn poll_finished(&mut self) -> Result<bool, AxisError> {
        (**self).poll_finished()
    }

    fn stop(&mut self) -> Result<(), AxisError> {
        (**self).stop()
    }
}
