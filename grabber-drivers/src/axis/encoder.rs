//! Encoder-counted DC axis
//!
//! A brushed motor on one H-bridge channel (PWM for speed, a direction
//! pin), a quadrature or single-channel encoder feeding a pulse counter,
//! and a home switch at the zero end of travel.
//!
//! Relative moves reset the counter and finish once it reaches the
//! commanded distance. The driver does not stop on its own; the motion
//! controller polls [`poll_finished`](AxisDriver::poll_finished) and stops
//! the axis.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use grabber_core::traits::{AxisDriver, AxisError};

/// Source of encoder pulses since the last reset
pub trait PulseCounter {
    /// Pulses counted since the last [`reset`](Self::reset)
    fn pulses(&self) -> u32;

    /// Restart counting from zero
    fn reset(&mut self);
}

/// Encoder axis configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderAxisConfig {
    /// Speed magnitude that maps to full duty
    pub full_scale_speed: u16,
    /// Switch reads low when pressed
    pub limit_active_low: bool,
    /// Swap the direction pin polarity
    pub invert_direction: bool,
}

impl Default for EncoderAxisConfig {
    fn default() -> Self {
        Self {
            full_scale_speed: 1023,
            limit_active_low: true,
            invert_direction: false,
        }
    }
}

/// DC axis with encoder feedback and a home switch
pub struct EncoderAxis<M, D, L, C> {
    motor: M,
    dir: D,
    limit: L,
    counter: C,
    config: EncoderAxisConfig,
    /// Distance of the current relative move; `None` while jogging or idle
    target: Option<u32>,
    running: bool,
    /// Direction of the last drive, true when away from home
    away: bool,
}

impl<M, D, L, C> EncoderAxis<M, D, L, C>
where
    M: SetDutyCycle,
    D: OutputPin,
    L: InputPin,
    C: PulseCounter,
{
    /// Create a new axis; the motor is switched off
    pub fn new(
        motor: M,
        dir: D,
        limit: L,
        counter: C,
        config: EncoderAxisConfig,
    ) -> Result<Self, AxisError> {
        let mut axis = Self {
            motor,
            dir,
            limit,
            counter,
            config,
            target: None,
            running: false,
            away: false,
        };
        axis.stop()?;
        Ok(axis)
    }

    /// Get the configuration
    pub fn config(&self) -> &EncoderAxisConfig {
        &self.config
    }

    /// Check if the motor is being driven
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pulses counted since the current move started
    pub fn pulses(&self) -> u32 {
        self.counter.pulses()
    }

    /// Release the underlying peripherals
    pub fn release(self) -> (M, D, L, C) {
        (self.motor, self.dir, self.limit, self.counter)
    }

    /// Set direction and duty for a signed speed
    fn drive(&mut self, speed: i32) -> Result<(), AxisError> {
        let full_scale = self.config.full_scale_speed;
        if speed == 0 || full_scale == 0 {
            return Err(AxisError::InvalidSpeed);
        }

        // Negative speeds drive away from the home switch
        let away = (speed < 0) != self.config.invert_direction;

        // Never reverse the bridge under power
        if self.running && away != self.away {
            self.motor
                .set_duty_cycle_fully_off()
                .map_err(|_| AxisError::Link)?;
        }

        if away {
            self.dir.set_high().map_err(|_| AxisError::Link)?;
        } else {
            self.dir.set_low().map_err(|_| AxisError::Link)?;
        }

        let magnitude = speed.unsigned_abs().min(full_scale as u32) as u16;
        self.motor
            .set_duty_cycle_fraction(magnitude, full_scale)
            .map_err(|_| AxisError::Link)?;
        self.away = away;
        self.running = true;
        Ok(())
    }
}

impl<M, D, L, C> AxisDriver for EncoderAxis<M, D, L, C>
where
    M: SetDutyCycle,
    D: OutputPin,
    L: InputPin,
    C: PulseCounter,
{
    fn command(&mut self, distance: u32, speed: i32) -> Result<(), AxisError> {
        self.counter.reset();
        self.target = Some(distance);
        self.drive(speed)
    }

    fn jog(&mut self, speed: i32) -> Result<(), AxisError> {
        self.counter.reset();
        self.target = None;
        self.drive(speed)
    }

    fn poll_limit(&mut self) -> Result<bool, AxisError> {
        let pressed = if self.config.limit_active_low {
            self.limit.is_low()
        } else {
            self.limit.is_high()
        };
        pressed.map_err(|_| AxisError::Link)
    }

    fn poll_finished(&mut self) -> Result<bool, AxisError> {
        Ok(self
            .target
            .is_some_and(|target| self.counter.pulses() >= target))
    }

    fn stop(&mut self) -> Result<(), AxisError> {
        self.running = false;
        self.motor
            .set_duty_cycle_fully_off()
            .map_err(|_| AxisError::Link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::{self, ErrorType as DigitalErrorType};
    use embedded_hal::pwm::ErrorType as PwmErrorType;

    /// Mock PWM channel with a 0-1000 duty range
    struct MockPwm<'a> {
        duty: &'a Cell<u16>,
    }

    impl PwmErrorType for MockPwm<'_> {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm<'_> {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty.set(duty);
            Ok(())
        }
    }

    /// Mock GPIO pin shared with the test through a cell
    struct MockPin<'a> {
        high: &'a Cell<bool>,
        fail: bool,
        /// Motor duty and the highest duty seen while this pin changed level
        duty_watch: Option<(&'a Cell<u16>, &'a Cell<u16>)>,
    }

    impl MockPin<'_> {
        fn drive(&mut self, high: bool) {
            if let Some((duty, worst)) = self.duty_watch {
                if self.high.get() != high {
                    worst.set(worst.get().max(duty.get()));
                }
            }
            self.high.set(high);
        }
    }

    impl DigitalErrorType for MockPin<'_> {
        type Error = digital::ErrorKind;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.drive(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.drive(true);
            Ok(())
        }
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.fail {
                return Err(digital::ErrorKind::Other);
            }
            Ok(self.high.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    struct MockCounter<'a> {
        pulses: &'a Cell<u32>,
    }

    impl PulseCounter for MockCounter<'_> {
        fn pulses(&self) -> u32 {
            self.pulses.get()
        }

        fn reset(&mut self) {
            self.pulses.set(0);
        }
    }

    struct Rig {
        duty: Cell<u16>,
        dir: Cell<bool>,
        limit: Cell<bool>,
        pulses: Cell<u32>,
        duty_on_reversal: Cell<u16>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                duty: Cell::new(0),
                dir: Cell::new(false),
                // Active-low switch, released
                limit: Cell::new(true),
                pulses: Cell::new(0),
                duty_on_reversal: Cell::new(0),
            }
        }

        fn axis(
            &self,
            config: EncoderAxisConfig,
        ) -> EncoderAxis<MockPwm<'_>, MockPin<'_>, MockPin<'_>, MockCounter<'_>> {
            EncoderAxis::new(
                MockPwm { duty: &self.duty },
                MockPin {
                    high: &self.dir,
                    fail: false,
                    duty_watch: Some((&self.duty, &self.duty_on_reversal)),
                },
                MockPin {
                    high: &self.limit,
                    fail: false,
                    duty_watch: None,
                },
                MockCounter {
                    pulses: &self.pulses,
                },
                config,
            )
            .unwrap()
        }
    }

    #[test]
    fn test_starts_stopped() {
        let rig = Rig::new();
        rig.duty.set(700);
        let axis = rig.axis(EncoderAxisConfig::default());

        assert!(!axis.is_running());
        assert_eq!(rig.duty.get(), 0);
    }

    #[test]
    fn test_command_sets_direction_and_duty() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig {
            full_scale_speed: 1000,
            ..Default::default()
        });

        // Away from home
        axis.command(1175, -500).unwrap();
        assert!(rig.dir.get());
        assert_eq!(rig.duty.get(), 500);
        assert!(axis.is_running());

        // Toward home
        axis.command(200, 250).unwrap();
        assert!(!rig.dir.get());
        assert_eq!(rig.duty.get(), 250);
    }

    #[test]
    fn test_reversal_cuts_duty_first() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig {
            full_scale_speed: 1000,
            ..Default::default()
        });

        axis.jog(-800).unwrap();
        axis.command(200, 600).unwrap();
        axis.command(200, -400).unwrap();

        assert_eq!(rig.duty_on_reversal.get(), 0);
        assert_eq!(rig.duty.get(), 400);
        assert!(rig.dir.get());
    }

    #[test]
    fn test_speed_clamped_to_full_scale() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig {
            full_scale_speed: 1000,
            ..Default::default()
        });

        axis.jog(5000).unwrap();
        assert_eq!(rig.duty.get(), 1000);
    }

    #[test]
    fn test_zero_speed_rejected() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig::default());

        assert_eq!(axis.command(10, 0), Err(AxisError::InvalidSpeed));
        assert!(!axis.is_running());
    }

    #[test]
    fn test_inverted_direction() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig {
            invert_direction: true,
            ..Default::default()
        });

        axis.command(10, -512).unwrap();
        assert!(!rig.dir.get());
    }

    #[test]
    fn test_finishes_at_commanded_distance() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig::default());

        rig.pulses.set(999);
        axis.command(300, -512).unwrap();
        // Counter restarted for the new move
        assert_eq!(axis.pulses(), 0);
        assert!(!axis.poll_finished().unwrap());

        rig.pulses.set(299);
        assert!(!axis.poll_finished().unwrap());
        rig.pulses.set(300);
        assert!(axis.poll_finished().unwrap());
    }

    #[test]
    fn test_jog_never_finishes() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig::default());

        axis.jog(512).unwrap();
        rig.pulses.set(u32::MAX);
        assert!(!axis.poll_finished().unwrap());
    }

    #[test]
    fn test_limit_polarity() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig::default());
        assert!(!axis.poll_limit().unwrap());
        rig.limit.set(false);
        assert!(axis.poll_limit().unwrap());

        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig {
            limit_active_low: false,
            ..Default::default()
        });
        assert!(axis.poll_limit().unwrap());
    }

    #[test]
    fn test_limit_read_error() {
        let rig = Rig::new();
        let mut axis = EncoderAxis::new(
            MockPwm { duty: &rig.duty },
            MockPin {
                high: &rig.dir,
                fail: false,
                duty_watch: None,
            },
            MockPin {
                high: &rig.limit,
                fail: true,
                duty_watch: None,
            },
            MockCounter {
                pulses: &rig.pulses,
            },
            EncoderAxisConfig::default(),
        )
        .unwrap();

        assert_eq!(axis.poll_limit(), Err(AxisError::Link));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let rig = Rig::new();
        let mut axis = rig.axis(EncoderAxisConfig::default());

        axis.jog(512).unwrap();
        axis.stop().unwrap();
        axis.stop().unwrap();
        assert_eq!(rig.duty.get(), 0);
        assert!(!axis.is_running());
    }
}
