//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod button;
pub mod controller;
pub mod encoder;

pub use button::button_task;
pub use controller::controller_task;
pub use encoder::encoder_task;
