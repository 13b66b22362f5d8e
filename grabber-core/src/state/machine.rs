//! State machine definition
//!
//! Whether the trigger is live and whether homing may start are a function
//! of the current state alone.

use super::events::Event;
use crate::grab::SequenceError;
use crate::motion::{Axis, MotionError};
use crate::traits::ConnectionError;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Hardware connected, positions unknown
    Boot,
    /// Homing pass in progress
    Homing,
    /// Homed and idle; trigger enabled
    Ready,
    /// Grab cycle in progress
    Cycling,
    /// Stopped after a failure
    Error(ErrorKind),
}

/// Types of errors that can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Hardware link lost or never established
    LinkDown,
    /// Axis did not finish within its budget
    AxisStall(Axis),
    /// Axis driver reported an error
    AxisFault(Axis),
    /// Valve output could not be driven
    ValveFault,
    /// Motion requested before homing
    NotHomed,
}

impl ErrorKind {
    /// Check if re-homing can clear this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ErrorKind::LinkDown)
    }
}

impl From<MotionError> for ErrorKind {
    fn from(e: MotionError) -> Self {
        match e {
            MotionError::NotHomed => ErrorKind::NotHomed,
            MotionError::TimedOut(axis) => ErrorKind::AxisStall(axis),
            MotionError::Faulted { axis, .. } => ErrorKind::AxisFault(axis),
        }
    }
}

impl From<SequenceError> for ErrorKind {
    fn from(e: SequenceError) -> Self {
        match e {
            SequenceError::Motion(e) => e.into(),
            SequenceError::Valve(_) => ErrorKind::ValveFault,
        }
    }
}

impl From<ConnectionError> for ErrorKind {
    fn from(_: ConnectionError) -> Self {
        ErrorKind::LinkDown
    }
}

impl State {
    /// Check if the start trigger should be enabled
    pub fn trigger_enabled(&self) -> bool {
        matches!(self, State::Ready)
    }

    /// Check if a homing pass may start
    pub fn homing_allowed(&self) -> bool {
        match self {
            State::Boot | State::Ready => true,
            State::Error(kind) => kind.is_recoverable(),
            State::Homing | State::Cycling => false,
        }
    }

    /// Process an event and return the next state
    ///
    /// Events not valid in the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Homing
            (Boot, StartHoming) => Homing,
            (Ready, StartHoming) => Homing,
            (Homing, HomingComplete) => Ready,

            // Cycle
            (Ready, Trigger) => Cycling,
            (Cycling, CycleComplete) => Ready,

            // Recovery by re-homing
            (Error(kind), StartHoming) if kind.is_recoverable() => Homing,

            // Faults latch; the first one wins
            (Error(kind), Fault(_)) => Error(kind),
            (_, Fault(kind)) => Error(kind),

            // Invalid transitions - stay in current state
            (state, _) => state,
        }
    }
}
