//! Status reporting
//!
//! Every diagnostic line the controller produces goes through a
//! [`StatusSink`] supplied by the caller. Events are typed so hosts can
//! render or filter them; `Display` gives the operator-facing text.

use core::fmt;

use super::ConnectionError;
use crate::motion::{Axis, Position};

/// Diagnostic events emitted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    /// Hardware link could not be established
    ConnectionFailed(ConnectionError),
    /// Home switch reached during homing; axis zeroed
    AxisHomed(Axis),
    /// Both axes homed
    Homed,
    /// Limit switch hit mid-move; axis position forced to zero
    Rezeroed(Axis),
    /// Move finished on both axes
    MoveSettled(Position),
    /// Move exceeded its tick budget; axes stopped
    MoveTimedOut(Axis),
    /// Axis driver failed during a move; axes stopped
    AxisFaulted(Axis),
    /// Closing valve about to be energized
    GripperClosing,
    /// Opening valve about to be energized
    GripperOpening,
    /// One pass of the step list finished (1-based)
    RepetitionComplete(u8),
    /// All repetitions finished
    CycleComplete,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::ConnectionFailed(e) => write!(f, "Error connecting IO server: {}", e),
            StatusEvent::AxisHomed(axis) => write!(f, "Motor {} initialized.", axis),
            StatusEvent::Homed => f.write_str("Model initialized."),
            StatusEvent::Rezeroed(axis) => write!(f, "Reinitialized motor {}", axis),
            StatusEvent::MoveSettled(p) => write!(f, "Moved to (x,z): ({},{})", p.x, p.z),
            StatusEvent::MoveTimedOut(axis) => write!(f, "Motor {} timed out, stopped", axis),
            StatusEvent::AxisFaulted(axis) => write!(f, "Motor {} faulted, stopped", axis),
            StatusEvent::GripperClosing => f.write_str("Closing grabber"),
            StatusEvent::GripperOpening => f.write_str("Opening grabber"),
            StatusEvent::RepetitionComplete(n) => write!(f, "Grab {} complete", n),
            StatusEvent::CycleComplete => f.write_str("Grab cycle complete"),
        }
    }
}

/// Receiver of status events
pub trait StatusSink {
    /// Record one event
    fn report(&mut self, event: StatusEvent);
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    fn report(&mut self, event: StatusEvent) {
        (**self).report(event)
    }
}
