//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Homing pass started
    StartHoming,
    /// Both axes homed
    HomingComplete,
    /// Operator pressed the start trigger
    Trigger,
    /// All repetitions of the grab cycle finished
    CycleComplete,
    /// Failure reported by the controller
    Fault(ErrorKind),
}
