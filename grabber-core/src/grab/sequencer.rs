//! Grab cycle sequencer
//!
//! Drives the motion controller and the gripper through the configured step
//! list. Steps run strictly in order; each move blocks until settled and
//! each grip blocks for the settle delay.

use embedded_hal_async::delay::DelayNs;

use super::cycle::CycleStep;
use super::grabber::Grabber;
use crate::config::CycleConfig;
use crate::motion::{MotionController, MotionError, Position, Speeds};
use crate::traits::{ActuatorError, AxisDriver, StatusEvent, StatusSink, ValveOutput};

/// Failure of a single sequencer operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// Move did not settle
    Motion(MotionError),
    /// Valve could not be driven
    Valve(ActuatorError),
}

impl From<MotionError> for SequenceError {
    fn from(e: MotionError) -> Self {
        SequenceError::Motion(e)
    }
}

impl From<ActuatorError> for SequenceError {
    fn from(e: ActuatorError) -> Self {
        SequenceError::Valve(e)
    }
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceError::Motion(e) => write!(f, "{}", e),
            SequenceError::Valve(e) => write!(f, "{}", e),
        }
    }
}

/// Failure of a grab cycle, with where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleError {
    /// Repetition in progress (1-based)
    pub repetition: u8,
    /// Index of the failed step
    pub step: usize,
    pub cause: SequenceError,
}

impl core::fmt::Display for CycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "grab {} step {} failed: {}",
            self.repetition, self.step, self.cause
        )
    }
}

/// Runs grab cycles on a motion controller and gripper
pub struct GrabSequencer<X, Z, V, D, S> {
    motion: MotionController<X, Z, D, S>,
    grabber: Grabber<V>,
    cycle: CycleConfig,
}

impl<X, Z, V, D, S> GrabSequencer<X, Z, V, D, S>
where
    X: AxisDriver,
    Z: AxisDriver,
    V: ValveOutput,
    D: DelayNs,
    S: StatusSink,
{
    pub fn new(
        motion: MotionController<X, Z, D, S>,
        grabber: Grabber<V>,
        cycle: CycleConfig,
    ) -> Self {
        Self {
            motion,
            grabber,
            cycle,
        }
    }

    pub fn motion(&self) -> &MotionController<X, Z, D, S> {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut MotionController<X, Z, D, S> {
        &mut self.motion
    }

    /// Current position, if trusted
    pub fn position(&self) -> Option<Position> {
        self.motion.position()
    }

    /// Open the gripper, then home both axes
    pub async fn home(&mut self) -> Result<Position, SequenceError> {
        self.toggle_grabber(false).await?;
        Ok(self.motion.home().await?)
    }

    /// Close (`true`) or open (`false`) the gripper and wait for it to settle
    pub async fn toggle_grabber(&mut self, close: bool) -> Result<(), SequenceError> {
        let (delay, sink) = self.motion.io_mut();
        self.grabber.toggle(close, delay, sink).await?;
        Ok(())
    }

    /// Execute one step
    pub async fn run_step(&mut self, step: CycleStep) -> Result<(), SequenceError> {
        match step {
            CycleStep::Move {
                x,
                z,
                speed_x,
                speed_z,
            } => {
                let default = self.motion.config().default_speed;
                let speeds = Speeds::new(speed_x.unwrap_or(default), speed_z.unwrap_or(default));
                self.motion.move_to_at(Position::new(x, z), speeds).await?;
            }
            CycleStep::Grip(state) => {
                self.toggle_grabber(state.is_closed()).await?;
            }
        }
        Ok(())
    }

    /// Run the step list `repeat_count` times
    ///
    /// Stops at the first failing step. Returns the position after the last
    /// step.
    pub async fn run_cycle(&mut self) -> Result<Position, CycleError> {
        let steps = self.cycle.steps.clone();

        for repetition in 1..=self.cycle.repeat_count {
            for (index, step) in steps.iter().enumerate() {
                if let Err(cause) = self.run_step(*step).await {
                    return Err(CycleError {
                        repetition,
                        step: index,
                        cause,
                    });
                }
            }
            self.report(StatusEvent::RepetitionComplete(repetition));
        }

        self.report(StatusEvent::CycleComplete);

        self.motion.position().ok_or(CycleError {
            repetition: self.cycle.repeat_count,
            step: steps.len(),
            cause: SequenceError::Motion(MotionError::NotHomed),
        })
    }

    fn report(&mut self, event: StatusEvent) {
        let (_, sink) = self.motion.io_mut();
        sink.report(event);
    }
}
