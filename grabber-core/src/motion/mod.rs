//! Two-axis motion
//!
//! Absolute moves over relative axis drivers, with limit-switch homing.

pub mod controller;
pub mod position;

pub use controller::MotionController;
pub use position::{plan_axis, Axis, AxisPlan, MotionError, MoveState, Position, Speeds};
