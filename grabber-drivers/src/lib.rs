//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in grabber-core on top of `embedded-hal`:
//!
//! - Encoder-counted DC axis with a home switch
//! - Gripper valve outputs (PWM and switched)

#![no_std]
#![deny(unsafe_code)]

pub mod axis;
pub mod valve;
