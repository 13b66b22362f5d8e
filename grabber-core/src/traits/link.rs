//! Hardware link
//!
//! The link is how a session obtains its hardware. Establishing it is the
//! only fallible step before the controller exists; when it fails no
//! controller or sequencer is ever built.

use super::{AxisDriver, ValveOutput};

/// Reasons the hardware link could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionError {
    /// I/O controller did not answer
    Unreachable,
    /// Motor driver reports a fault at power-up
    DriverFault,
    /// Peripheral could not be configured
    Configuration,
}

impl core::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConnectionError::Unreachable => f.write_str("I/O controller unreachable"),
            ConnectionError::DriverFault => f.write_str("motor driver fault at power-up"),
            ConnectionError::Configuration => f.write_str("I/O configuration rejected"),
        }
    }
}

/// Hardware handed over by a successful link
pub struct Hardware<X, Z, V> {
    /// X axis (horizontal traverse)
    pub axis_x: X,
    /// Z axis (vertical lift)
    pub axis_z: Z,
    /// Valve that opens the gripper when energized
    pub valve_open: V,
    /// Valve that closes the gripper when energized
    pub valve_closed: V,
}

/// Source of the machine's hardware handles
pub trait HardwareLink {
    /// X axis driver type
    type AxisX: AxisDriver;
    /// Z axis driver type
    type AxisZ: AxisDriver;
    /// Valve output type (both valves share it)
    type Valve: ValveOutput;

    /// Establish the link and hand over the owned hardware
    fn connect(self) -> Result<Hardware<Self::AxisX, Self::AxisZ, Self::Valve>, ConnectionError>;
}

impl<X: AxisDriver, Z: AxisDriver, V: ValveOutput> HardwareLink for Hardware<X, Z, V> {
    type AxisX = X;
    type AxisZ = Z;
    type Valve = V;

    fn connect(self) -> Result<Hardware<X, Z, V>, ConnectionError> {
        Ok(self)
    }
}
