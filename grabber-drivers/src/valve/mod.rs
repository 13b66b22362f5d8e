//! Valve output drivers

pub mod pwm;
pub mod switched;

pub use pwm::PwmValve;
pub use switched::SwitchedValve;
