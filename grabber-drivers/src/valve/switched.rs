//! Switched valve output
//!
//! On/off solenoid on a GPIO pin (directly or via a MOSFET). Any non-zero
//! level energizes the valve.

use embedded_hal::digital::OutputPin;
use grabber_core::traits::{ActuatorError, ValveOutput};

/// Solenoid valve on a digital output
pub struct SwitchedValve<P> {
    pin: P,
    /// If true, valve ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> SwitchedValve<P> {
    /// Create a new valve output, initially off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the valve is energized when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Result<Self, ActuatorError> {
        let mut valve = Self {
            pin,
            inverted,
            on: false,
        };
        valve.set_level(0)?;
        Ok(valve)
    }

    /// Create a valve with an active-high output
    pub fn new_active_high(pin: P) -> Result<Self, ActuatorError> {
        Self::new(pin, false)
    }

    /// Create a valve with an active-low output
    pub fn new_active_low(pin: P) -> Result<Self, ActuatorError> {
        Self::new(pin, true)
    }

    /// Check if the valve is energized
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl<P: OutputPin> ValveOutput for SwitchedValve<P> {
    fn set_level(&mut self, level: u16) -> Result<(), ActuatorError> {
        let on = level > 0;

        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| ActuatorError::Link)?;

        self.on = on;
        Ok(())
    }
}
