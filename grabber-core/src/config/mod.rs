//! Configuration types
//!
//! Board-agnostic configuration structures. Parsed from `machine.toml` on
//! the host and stored in firmware as postcard binary data.

pub mod types;

pub use types::*;
