//! Board wiring
//!
//! Pin assignments for the reference board and the [`HardwareLink`] that
//! turns the raw peripherals into axis drivers and valve outputs.
//!
//! | Function        | GPIO | Peripheral |
//! |-----------------|------|------------|
//! | X motor PWM     | 2    | PWM1 A     |
//! | Z motor PWM     | 3    | PWM1 B     |
//! | Valve open      | 4    | PWM2 A     |
//! | Valve closed    | 5    | PWM2 B     |
//! | X direction     | 6    | output     |
//! | Z direction     | 7    | output     |
//! | X home switch   | 8    | input, pull-up |
//! | Z home switch   | 9    | input, pull-up |
//! | X encoder       | 10   | input      |
//! | Z encoder       | 11   | input      |
//! | Start button    | 12   | input, pull-up |
//! | H-bridge nFAULT | 13   | input, pull-up |
//! | Ready LED       | 25   | output     |

use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use portable_atomic::{AtomicU32, Ordering};

use grabber_core::traits::{ConnectionError, Hardware, HardwareLink};
use grabber_drivers::axis::{EncoderAxis, EncoderAxisConfig, PulseCounter};
use grabber_drivers::valve::PwmValve;

/// PWM counter top; also the full-scale speed and valve level
pub const PWM_TOP: u16 = 1023;

/// Encoder count shared with an encoder task
pub struct EncoderCount(&'static AtomicU32);

impl EncoderCount {
    pub fn new(pulses: &'static AtomicU32) -> Self {
        Self(pulses)
    }
}

impl PulseCounter for EncoderCount {
    fn pulses(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&mut self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

pub type BoardAxis =
    EncoderAxis<PwmOutput<'static>, Output<'static>, Input<'static>, EncoderCount>;
pub type BoardValve = PwmValve<PwmOutput<'static>>;

/// Peripherals of one axis
pub struct AxisPins {
    pub motor: PwmOutput<'static>,
    pub dir: Output<'static>,
    pub limit: Input<'static>,
    pub counter: EncoderCount,
}

/// All grabber peripherals, not yet checked
pub struct BoardLink {
    pub x: AxisPins,
    pub z: AxisPins,
    pub valve_open: PwmOutput<'static>,
    pub valve_closed: PwmOutput<'static>,
    /// H-bridge fault line, low while faulted
    pub fault: Input<'static>,
}

impl BoardLink {
    fn axis(pins: AxisPins) -> Result<BoardAxis, ConnectionError> {
        let config = EncoderAxisConfig {
            full_scale_speed: PWM_TOP,
            limit_active_low: true,
            invert_direction: false,
        };
        EncoderAxis::new(pins.motor, pins.dir, pins.limit, pins.counter, config)
            .map_err(|_| ConnectionError::Configuration)
    }

    fn valve(pwm: PwmOutput<'static>) -> Result<BoardValve, ConnectionError> {
        PwmValve::new(pwm, PWM_TOP).map_err(|_| ConnectionError::Configuration)
    }
}

impl HardwareLink for BoardLink {
    type AxisX = BoardAxis;
    type AxisZ = BoardAxis;
    type Valve = BoardValve;

    fn connect(self) -> Result<Hardware<BoardAxis, BoardAxis, BoardValve>, ConnectionError> {
        if self.fault.is_low() {
            return Err(ConnectionError::DriverFault);
        }

        Ok(Hardware {
            axis_x: Self::axis(self.x)?,
            axis_z: Self::axis(self.z)?,
            valve_open: Self::valve(self.valve_open)?,
            valve_closed: Self::valve(self.valve_closed)?,
        })
    }
}
