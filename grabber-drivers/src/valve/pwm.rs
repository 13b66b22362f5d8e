//! PWM valve output
//!
//! Drives a solenoid through a PWM channel. The valve level is a fraction
//! of `full_scale`, so a level of 512 on a 1023 scale holds the solenoid at
//! half duty.

use embedded_hal::pwm::SetDutyCycle;
use grabber_core::traits::{ActuatorError, ValveOutput};

/// Solenoid valve on a PWM channel
pub struct PwmValve<P> {
    pwm: P,
    /// Level that maps to full duty
    full_scale: u16,
    level: u16,
}

impl<P: SetDutyCycle> PwmValve<P> {
    /// Create a new valve output, initially off
    pub fn new(pwm: P, full_scale: u16) -> Result<Self, ActuatorError> {
        if full_scale == 0 {
            return Err(ActuatorError::InvalidLevel);
        }

        let mut valve = Self {
            pwm,
            full_scale,
            level: 0,
        };
        valve.set_level(0)?;
        Ok(valve)
    }

    /// Last level applied
    pub fn level(&self) -> u16 {
        self.level
    }
}

impl<P: SetDutyCycle> ValveOutput for PwmValve<P> {
    fn set_level(&mut self, level: u16) -> Result<(), ActuatorError> {
        if level > self.full_scale {
            return Err(ActuatorError::InvalidLevel);
        }

        self.pwm
            .set_duty_cycle_fraction(level, self.full_scale)
            .map_err(|_| ActuatorError::Link)?;
        self.level = level;
        Ok(())
    }
}
