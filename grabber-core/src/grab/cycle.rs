//! Grab cycle definition
//!
//! A cycle is an ordered list of steps, each either a move to an absolute
//! position or a gripper toggle, repeated a fixed number of times.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::motion::Position;

/// Maximum steps in one cycle
pub const MAX_CYCLE_STEPS: usize = 16;

/// Repetitions per trigger
pub const REPEAT_COUNT: u8 = 10;

/// Gripper state requested by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum GripState {
    Open,
    Closed,
}

impl GripState {
    pub fn is_closed(self) -> bool {
        self == GripState::Closed
    }
}

/// One step of the grab cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum CycleStep {
    /// Move both axes to an absolute position
    Move {
        x: i32,
        z: i32,
        /// X speed override (default speed when absent)
        #[serde(default)]
        speed_x: Option<i32>,
        /// Z speed override (default speed when absent)
        #[serde(default)]
        speed_z: Option<i32>,
    },
    /// Drive the valve pair and wait for it to settle
    Grip(GripState),
}

impl CycleStep {
    /// Move at default speeds
    pub const fn move_to(x: i32, z: i32) -> Self {
        CycleStep::Move {
            x,
            z,
            speed_x: None,
            speed_z: None,
        }
    }

    /// Move with explicit speeds
    pub const fn move_at(x: i32, z: i32, speed_x: i32, speed_z: i32) -> Self {
        CycleStep::Move {
            x,
            z,
            speed_x: Some(speed_x),
            speed_z: Some(speed_z),
        }
    }

    /// Target position, for move steps
    pub fn target(&self) -> Option<Position> {
        match self {
            CycleStep::Move { x, z, .. } => Some(Position::new(*x, *z)),
            CycleStep::Grip(_) => None,
        }
    }
}

/// Pick-and-place sequence of the reference machine
///
/// Lift to the pick height, close, lower, traverse at reduced X speed,
/// drop height, open, return.
pub const DEFAULT_STEPS: [CycleStep; 7] = [
    CycleStep::move_to(0, 1175),
    CycleStep::Grip(GripState::Closed),
    CycleStep::move_to(0, 1000),
    CycleStep::move_at(1000, 100, 280, 512),
    CycleStep::move_to(1000, 300),
    CycleStep::Grip(GripState::Open),
    CycleStep::move_to(1000, 100),
];

/// Default step list as a bounded vector
pub fn default_steps() -> Vec<CycleStep, MAX_CYCLE_STEPS> {
    let mut steps = Vec::new();
    for step in DEFAULT_STEPS {
        // DEFAULT_STEPS is shorter than MAX_CYCLE_STEPS
        let _ = steps.push(step);
    }
    steps
}

/// Position the axes hold after a full pass of `steps`
///
/// Returns `None` if the list contains no move.
pub fn final_position(steps: &[CycleStep]) -> Option<Position> {
    steps.iter().rev().find_map(CycleStep::target)
}
