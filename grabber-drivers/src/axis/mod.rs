//! Axis drivers

pub mod encoder;

pub use encoder::{EncoderAxis, EncoderAxisConfig, PulseCounter};
