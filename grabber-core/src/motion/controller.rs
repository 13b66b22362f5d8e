//! Dual-axis motion controller
//!
//! Owns the X and Z axis drivers and the controller's belief about the
//! absolute position. Moves are converted into relative commands, then both
//! axes are supervised by one polling loop until each has finished or hit
//! its limit switch. The poll delay is the only suspension point.

use embedded_hal_async::delay::DelayNs;

use super::position::{plan_axis, Axis, MotionError, MoveState, Position, Speeds};
use crate::config::MotionConfig;
use crate::safety::{MoveWatchdog, WatchdogStatus};
use crate::traits::{AxisDriver, AxisError, StatusEvent, StatusSink};

/// Supervision state of one axis during a move
#[derive(Debug, Clone, Copy)]
struct AxisMove {
    axis: Axis,
    /// Position when the move started
    start: i32,
    /// Target this move will record; forced to 0 on a re-zero
    target: i32,
    done: bool,
}

impl AxisMove {
    fn new(axis: Axis, start: i32, target: i32) -> Self {
        Self {
            axis,
            start,
            target,
            done: false,
        }
    }

    /// One supervision tick for this axis
    ///
    /// An axis that left zero and now sees its limit switch has lost steps:
    /// it is stopped and re-zeroed. An axis that started at zero ignores the
    /// switch it is sitting on and only ends on completion.
    fn poll<A: AxisDriver, S: StatusSink>(
        &mut self,
        driver: &mut A,
        sink: &mut S,
    ) -> Result<(), AxisError> {
        if self.done {
            return Ok(());
        }

        if self.start != 0 && driver.poll_limit()? {
            driver.stop()?;
            self.target = 0;
            self.done = true;
            sink.report(StatusEvent::Rezeroed(self.axis));
        } else if driver.poll_finished()? {
            driver.stop()?;
            self.done = true;
        }

        Ok(())
    }
}

/// Two-axis controller with limit-switch re-zeroing
pub struct MotionController<X, Z, D, S> {
    axis_x: X,
    axis_z: Z,
    delay: D,
    sink: S,
    config: MotionConfig,
    /// Believed position, meaningful only while `homed`
    position: Position,
    homed: bool,
    state: MoveState,
}

impl<X, Z, D, S> MotionController<X, Z, D, S>
where
    X: AxisDriver,
    Z: AxisDriver,
    D: DelayNs,
    S: StatusSink,
{
    /// Create a controller; positions are untrusted until [`home`](Self::home)
    pub fn new(axis_x: X, axis_z: Z, delay: D, sink: S, config: MotionConfig) -> Self {
        Self {
            axis_x,
            axis_z,
            delay,
            sink,
            config,
            position: Position::ORIGIN,
            homed: false,
            state: MoveState::Idle,
        }
    }

    /// Current position, or `None` before homing or after a fault
    pub fn position(&self) -> Option<Position> {
        self.homed.then_some(self.position)
    }

    /// Check if the position is trusted
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Progress of the last move request
    pub fn state(&self) -> MoveState {
        self.state
    }

    /// Get configuration reference
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Delay and sink, for collaborators sharing the controller's timebase
    pub(crate) fn io_mut(&mut self) -> (&mut D, &mut S) {
        (&mut self.delay, &mut self.sink)
    }

    /// Move both axes to `target` at the default speed
    pub async fn move_to(&mut self, target: Position) -> Result<Position, MotionError> {
        let speeds = self.config.default_speeds();
        self.move_to_at(target, speeds).await
    }

    /// Move X only, holding Z
    pub async fn move_x(&mut self, x: i32) -> Result<Position, MotionError> {
        let target = self.position.with(Axis::X, x);
        self.move_to(target).await
    }

    /// Move Z only, holding X
    pub async fn move_z(&mut self, z: i32) -> Result<Position, MotionError> {
        let target = self.position.with(Axis::Z, z);
        self.move_to(target).await
    }

    /// Move both axes to `target` at the given speeds
    ///
    /// Blocks until both axes are done. Returns the recorded position, which
    /// differs from `target` on any axis that was re-zeroed by its limit
    /// switch. On timeout or driver fault both axes are stopped and the
    /// position becomes untrusted.
    pub async fn move_to_at(
        &mut self,
        target: Position,
        speeds: Speeds,
    ) -> Result<Position, MotionError> {
        if !self.homed {
            return Err(MotionError::NotHomed);
        }

        // Speeds are magnitudes; the sign is derived from the displacement
        for (axis, speed) in [(Axis::X, speeds.x), (Axis::Z, speeds.z)] {
            if speed <= 0 {
                return Err(MotionError::Faulted {
                    axis,
                    error: AxisError::InvalidSpeed,
                });
            }
        }

        let start = self.position;
        let mut x = AxisMove::new(Axis::X, start.x, target.x);
        let mut z = AxisMove::new(Axis::Z, start.z, target.z);

        self.state = MoveState::Commanding;

        match plan_axis(start.x, target.x, speeds.x) {
            Some(plan) => {
                if let Err(error) = self.axis_x.command(plan.distance, plan.speed) {
                    return Err(self.abort(MotionError::Faulted { axis: Axis::X, error }));
                }
            }
            None => x.done = true,
        }

        match plan_axis(start.z, target.z, speeds.z) {
            Some(plan) => {
                if let Err(error) = self.axis_z.command(plan.distance, plan.speed) {
                    return Err(self.abort(MotionError::Faulted { axis: Axis::Z, error }));
                }
            }
            None => z.done = true,
        }

        self.state = MoveState::Supervising;
        let mut watchdog =
            MoveWatchdog::from_timeout(self.config.move_timeout_ms, self.config.poll_interval_us);

        loop {
            if let Err(error) = x.poll(&mut self.axis_x, &mut self.sink) {
                return Err(self.abort(MotionError::Faulted { axis: Axis::X, error }));
            }
            if let Err(error) = z.poll(&mut self.axis_z, &mut self.sink) {
                return Err(self.abort(MotionError::Faulted { axis: Axis::Z, error }));
            }

            if x.done && z.done {
                break;
            }

            if watchdog.check() == WatchdogStatus::Expired {
                let axis = if x.done { Axis::Z } else { Axis::X };
                return Err(self.abort(MotionError::TimedOut(axis)));
            }

            self.delay.delay_us(self.config.poll_interval_us).await;
            watchdog.tick();
        }

        self.position = Position::new(x.target, z.target);
        self.state = MoveState::Settled;
        self.sink.report(StatusEvent::MoveSettled(self.position));

        Ok(self.position)
    }

    /// Drive both axes onto their home switches and zero them
    ///
    /// Both axes jog toward home at the homing speed; each is stopped and
    /// zeroed as its switch closes. Completes when both switches are pressed.
    pub async fn home(&mut self) -> Result<Position, MotionError> {
        self.homed = false;
        self.state = MoveState::Commanding;

        let speed = self.config.homing_speed;
        if let Err(error) = self.axis_x.jog(speed) {
            return Err(self.abort(MotionError::Faulted { axis: Axis::X, error }));
        }
        if let Err(error) = self.axis_z.jog(speed) {
            return Err(self.abort(MotionError::Faulted { axis: Axis::Z, error }));
        }

        self.state = MoveState::Supervising;
        let mut watchdog = MoveWatchdog::from_timeout(
            self.config.homing_timeout_ms,
            self.config.poll_interval_us,
        );
        let mut x_done = false;
        let mut z_done = false;

        loop {
            if !x_done {
                match home_axis(&mut self.axis_x) {
                    Ok(true) => {
                        self.position.x = 0;
                        self.sink.report(StatusEvent::AxisHomed(Axis::X));
                        x_done = true;
                    }
                    Ok(false) => {}
                    Err(error) => {
                        return Err(self.abort(MotionError::Faulted { axis: Axis::X, error }));
                    }
                }
            }

            if !z_done {
                match home_axis(&mut self.axis_z) {
                    Ok(true) => {
                        self.position.z = 0;
                        self.sink.report(StatusEvent::AxisHomed(Axis::Z));
                        z_done = true;
                    }
                    Ok(false) => {}
                    Err(error) => {
                        return Err(self.abort(MotionError::Faulted { axis: Axis::Z, error }));
                    }
                }
            }

            if x_done && z_done {
                break;
            }

            if watchdog.check() == WatchdogStatus::Expired {
                let axis = if x_done { Axis::Z } else { Axis::X };
                return Err(self.abort(MotionError::TimedOut(axis)));
            }

            self.delay.delay_us(self.config.poll_interval_us).await;
            watchdog.tick();
        }

        self.position = Position::ORIGIN;
        self.homed = true;
        self.state = MoveState::Settled;
        self.sink.report(StatusEvent::Homed);

        Ok(self.position)
    }

    /// Stop both axes, ignoring driver errors
    pub fn stop_all(&mut self) {
        let _ = self.axis_x.stop();
        let _ = self.axis_z.stop();
    }

    /// Stop everything, distrust the position and report the failure
    fn abort(&mut self, error: MotionError) -> MotionError {
        self.stop_all();
        self.homed = false;
        self.state = MoveState::Idle;

        match error {
            MotionError::TimedOut(axis) => self.sink.report(StatusEvent::MoveTimedOut(axis)),
            MotionError::Faulted { axis, .. } => self.sink.report(StatusEvent::AxisFaulted(axis)),
            MotionError::NotHomed => {}
        }

        error
    }

    #[cfg(test)]
    pub(crate) fn assume_position(&mut self, position: Position) {
        self.position = position;
        self.homed = true;
    }
}

/// Stop the axis once its home switch closes; returns whether it did
fn home_axis<A: AxisDriver>(driver: &mut A) -> Result<bool, AxisError> {
    if driver.poll_limit()? {
        driver.stop()?;
        Ok(true)
    } else {
        Ok(false)
    }
}
