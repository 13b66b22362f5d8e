//! Operator session
//!
//! The session is everything the outer application talks to: it connects
//! the hardware, builds the sequencer, and gates homing and the start
//! trigger through the state machine.

use embedded_hal_async::delay::DelayNs;

use crate::config::{ConfigError, MachineConfig};
use crate::grab::{CycleError, GrabSequencer, Grabber, SequenceError};
use crate::motion::{MotionController, Position};
use crate::state::{Event, State};
use crate::traits::{
    AxisDriver, ConnectionError, HardwareLink, StatusEvent, StatusSink, ValveOutput,
};

/// Session-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Hardware link could not be established
    Connection(ConnectionError),
    /// Configuration rejected before connecting
    Config(ConfigError),
    /// Request not allowed in the current state
    NotReady(State),
    /// Homing pass failed
    Homing(SequenceError),
    /// Grab cycle failed
    Cycle(CycleError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Connection(e) => write!(f, "Error connecting IO server: {}", e),
            SessionError::Config(e) => write!(f, "invalid configuration: {}", e),
            SessionError::NotReady(state) => write!(f, "not allowed in state {:?}", state),
            SessionError::Homing(e) => write!(f, "homing failed: {}", e),
            SessionError::Cycle(e) => write!(f, "{}", e),
        }
    }
}

/// Connected machine with its state machine
pub struct Session<X, Z, V, D, S> {
    sequencer: GrabSequencer<X, Z, V, D, S>,
    state: State,
}

impl<X, Z, V, D, S> Session<X, Z, V, D, S>
where
    X: AxisDriver,
    Z: AxisDriver,
    V: ValveOutput,
    D: DelayNs,
    S: StatusSink,
{
    /// Validate `config`, connect `link` and build the controller
    ///
    /// A failed connection is reported to `sink` before returning.
    pub fn open<L>(
        link: L,
        delay: D,
        mut sink: S,
        config: MachineConfig,
    ) -> Result<Self, SessionError>
    where
        L: HardwareLink<AxisX = X, AxisZ = Z, Valve = V>,
    {
        config.validate().map_err(SessionError::Config)?;

        let hardware = match link.connect() {
            Ok(hardware) => hardware,
            Err(e) => {
                sink.report(StatusEvent::ConnectionFailed(e));
                return Err(SessionError::Connection(e));
            }
        };

        let motion =
            MotionController::new(hardware.axis_x, hardware.axis_z, delay, sink, config.motion);
        let grabber = Grabber::new(hardware.valve_open, hardware.valve_closed, config.grabber);

        Ok(Self {
            sequencer: GrabSequencer::new(motion, grabber, config.cycle),
            state: State::Boot,
        })
    }

    /// Get current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check if the start trigger should be enabled
    pub fn trigger_enabled(&self) -> bool {
        self.state.trigger_enabled()
    }

    /// Current position, if trusted
    pub fn position(&self) -> Option<Position> {
        self.sequencer.position()
    }

    pub fn sequencer(&self) -> &GrabSequencer<X, Z, V, D, S> {
        &self.sequencer
    }

    /// Open the gripper and home both axes
    ///
    /// Allowed from boot, when ready, and to recover from a stall or fault.
    pub async fn home(&mut self) -> Result<Position, SessionError> {
        if !self.state.homing_allowed() {
            return Err(SessionError::NotReady(self.state));
        }

        self.apply(Event::StartHoming);
        match self.sequencer.home().await {
            Ok(position) => {
                self.apply(Event::HomingComplete);
                Ok(position)
            }
            Err(e) => {
                self.apply(Event::Fault(e.into()));
                Err(SessionError::Homing(e))
            }
        }
    }

    /// Run one grab cycle
    ///
    /// Rejected unless the trigger is enabled. The trigger stays disabled
    /// until the cycle has finished.
    pub async fn trigger(&mut self) -> Result<Position, SessionError> {
        if !self.state.trigger_enabled() {
            return Err(SessionError::NotReady(self.state));
        }

        self.apply(Event::Trigger);
        match self.sequencer.run_cycle().await {
            Ok(position) => {
                self.apply(Event::CycleComplete);
                Ok(position)
            }
            Err(e) => {
                self.apply(Event::Fault(e.cause.into()));
                Err(SessionError::Cycle(e))
            }
        }
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use crate::mock::{Clock, RecordingSink, RecordingValve, SimAxis};
    use crate::motion::{Axis, MotionError};
    use crate::state::ErrorKind;
    use crate::traits::Hardware;
    use embassy_futures::block_on;

    struct DeadLink;

    impl HardwareLink for DeadLink {
        type AxisX = SimAxis;
        type AxisZ = SimAxis;
        type Valve = RecordingValve;

        fn connect(self) -> Result<Hardware<SimAxis, SimAxis, RecordingValve>, ConnectionError> {
            Err(ConnectionError::Unreachable)
        }
    }

    #[test]
    fn test_connection_failure_reported() {
        let mut sink = RecordingSink::default();
        let result = Session::open(
            DeadLink,
            Clock::new(),
            &mut sink,
            MachineConfig::default(),
        );

        assert!(matches!(
            result,
            Err(SessionError::Connection(ConnectionError::Unreachable))
        ));
        drop(result);

        assert_eq!(
            sink.events,
            vec![StatusEvent::ConnectionFailed(ConnectionError::Unreachable)]
        );
    }

    #[test]
    fn test_invalid_config_rejected_before_connecting() {
        let mut sink = RecordingSink::default();
        let mut config = MachineConfig::default();
        config.cycle.repeat_count = 0;

        let result = Session::open(DeadLink, Clock::new(), &mut sink, config);
        assert!(matches!(
            result,
            Err(SessionError::Config(ConfigError::InvalidRepeatCount))
        ));
        drop(result);

        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_trigger_gated_until_homed() {
        let clock = Clock::new();
        let mut x = SimAxis::new(&clock, 120);
        let mut z = SimAxis::new(&clock, 40);
        let mut open = RecordingValve::default();
        let mut closed = RecordingValve::default();
        let mut sink = RecordingSink::default();

        let hardware = Hardware {
            axis_x: &mut x,
            axis_z: &mut z,
            valve_open: &mut open,
            valve_closed: &mut closed,
        };
        let mut session =
            Session::open(hardware, clock.clone(), &mut sink, MachineConfig::default()).unwrap();
        assert_eq!(session.state(), State::Boot);
        assert!(!session.trigger_enabled());

        // Trigger before homing does nothing
        let result = block_on(session.trigger());
        assert_eq!(result, Err(SessionError::NotReady(State::Boot)));
        assert_eq!(clock.now_us(), 0);

        assert_eq!(block_on(session.home()), Ok(Position::ORIGIN));
        assert_eq!(session.state(), State::Ready);
        assert!(session.trigger_enabled());

        assert_eq!(block_on(session.trigger()), Ok(Position::new(1000, 100)));
        assert_eq!(session.state(), State::Ready);
        assert_eq!(session.position(), Some(Position::new(1000, 100)));
        drop(session);

        assert_eq!(sink.count(StatusEvent::Homed), 1);
        assert_eq!(sink.count(StatusEvent::CycleComplete), 1);
        assert_eq!(open.level, 512);
    }

    #[test]
    fn test_stall_disables_trigger_until_rehomed() {
        let clock = Clock::new();
        let mut x = SimAxis::new(&clock, 0);
        let mut z = SimAxis::new(&clock, 0);
        let mut open = RecordingValve::default();
        let mut closed = RecordingValve::default();
        let mut sink = RecordingSink::default();

        // 100 ms covers 1000 steps; the first lift needs 1175
        let mut config = MachineConfig::default();
        config.motion = MotionConfig {
            move_timeout_ms: 100,
            ..MotionConfig::default()
        };

        let hardware = Hardware {
            axis_x: &mut x,
            axis_z: &mut z,
            valve_open: &mut open,
            valve_closed: &mut closed,
        };
        let mut session = Session::open(hardware, clock.clone(), &mut sink, config).unwrap();
        block_on(session.home()).unwrap();

        let result = block_on(session.trigger());
        assert!(matches!(
            result,
            Err(SessionError::Cycle(CycleError {
                repetition: 1,
                step: 0,
                cause: SequenceError::Motion(MotionError::TimedOut(Axis::Z)),
            }))
        ));
        assert_eq!(session.state(), State::Error(ErrorKind::AxisStall(Axis::Z)));
        assert!(!session.trigger_enabled());
        assert_eq!(session.position(), None);

        assert_eq!(
            block_on(session.trigger()),
            Err(SessionError::NotReady(State::Error(ErrorKind::AxisStall(Axis::Z))))
        );

        // Re-homing recovers
        assert_eq!(block_on(session.home()), Ok(Position::ORIGIN));
        assert_eq!(session.state(), State::Ready);
        drop(session);

        assert_eq!(z.physical, 0);
        assert_eq!(sink.count(StatusEvent::MoveTimedOut(Axis::Z)), 1);
    }
}
