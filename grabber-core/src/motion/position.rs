//! Position types for the two-axis gantry
//!
//! These types define the command/result interface between the sequencer
//! and the motion controller, plus the relative-move arithmetic.

use crate::traits::AxisError;

#[cfg(feature = "defmt")]
use defmt::Format;

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum Axis {
    /// X axis (horizontal traverse)
    X,
    /// Z axis (vertical lift)
    Z,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// Absolute position in motor steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Position {
    pub x: i32,
    pub z: i32,
}

impl Position {
    /// Home position, where both limit switches are pressed
    pub const ORIGIN: Position = Position { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Get the coordinate for one axis
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }

    /// Return a copy with one axis replaced
    pub fn with(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Z => Self { z: value, ..self },
        }
    }
}

/// Per-axis speeds for one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct Speeds {
    pub x: i32,
    pub z: i32,
}

impl Speeds {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Same speed on both axes
    pub const fn uniform(speed: i32) -> Self {
        Self { x: speed, z: speed }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }
}

/// Relative command for one axis of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub struct AxisPlan {
    /// Distance magnitude in steps
    pub distance: u32,
    /// Speed as sent to the driver (polarity applied)
    pub speed: i32,
}

/// Convert an absolute target into the relative command for one axis
///
/// Returns `None` when the axis is already at `target`. The driver is
/// wired so that a negative speed increases the position: the commanded
/// speed is the requested speed with the sign of the displacement negated.
pub fn plan_axis(current: i32, target: i32, speed: i32) -> Option<AxisPlan> {
    let delta = target as i64 - current as i64;
    if delta == 0 {
        return None;
    }

    let distance = delta.unsigned_abs().min(u32::MAX as u64) as u32;
    let speed = if delta > 0 { speed.saturating_neg() } else { speed };

    Some(AxisPlan { distance, speed })
}

/// Progress of a single move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum MoveState {
    /// No move in flight
    #[default]
    Idle,
    /// Relative commands being sent to the drivers
    Commanding,
    /// Polling both axes until done
    Supervising,
    /// Both axes done, position updated
    Settled,
}

/// Motion failures
///
/// A move either settles (`Ok(Position)`) or ends with one of these. After
/// `TimedOut` or `Faulted` both axes have been stopped and the position is
/// no longer trusted until the next homing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(Format))]
pub enum MotionError {
    /// Position unknown; `home()` has not completed
    NotHomed,
    /// Axis neither finished nor reached its limit within the tick budget
    TimedOut(Axis),
    /// Axis driver reported an error
    Faulted { axis: Axis, error: AxisError },
}

impl MotionError {
    /// Axis responsible for the failure, if any
    pub fn axis(&self) -> Option<Axis> {
        match self {
            MotionError::NotHomed => None,
            MotionError::TimedOut(axis) | MotionError::Faulted { axis, .. } => Some(*axis),
        }
    }
}

impl core::fmt::Display for MotionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MotionError::NotHomed => f.write_str("axes not homed"),
            MotionError::TimedOut(axis) => write!(f, "motor {} timed out", axis),
            MotionError::Faulted { axis, error } => write!(f, "motor {}: {}", axis, error),
        }
    }
}
