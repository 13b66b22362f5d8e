//! Inter-task communication channels
//!
//! Defines the statics shared between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicU32;

/// Debounced press of the start button
pub static TRIGGER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Trigger enable state (drives the ready LED)
pub static TRIGGER_ENABLED: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Encoder pulses on the X motor since the last reset
pub static X_PULSES: AtomicU32 = AtomicU32::new(0);

/// Encoder pulses on the Z motor since the last reset
pub static Z_PULSES: AtomicU32 = AtomicU32::new(0);
