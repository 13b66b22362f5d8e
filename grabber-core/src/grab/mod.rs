//! Grab cycle: gripper valves and the step sequencer

pub mod cycle;
pub mod grabber;
pub mod sequencer;

pub use cycle::{default_steps, final_position, CycleStep, GripState, DEFAULT_STEPS};
pub use grabber::Grabber;
pub use sequencer::{CycleError, GrabSequencer, SequenceError};
