//! Configuration type definitions
//!
//! These types represent the machine configuration. Every field has a
//! default matching the reference machine, so a config file only needs to
//! list what differs.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::grab::cycle::{default_steps, CycleStep, MAX_CYCLE_STEPS, REPEAT_COUNT};
use crate::motion::Speeds;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Config version does not match [`CONFIG_VERSION`]
    VersionMismatch,
    /// A speed is zero or negative
    InvalidSpeed,
    /// Poll interval is zero
    InvalidPollInterval,
    /// A timeout is zero
    InvalidTimeout,
    /// Repeat count is zero
    InvalidRepeatCount,
    /// Cycle has no steps
    EmptyCycle,
    /// Valve on and off levels are equal
    InvalidValveLevels,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::VersionMismatch => "config version mismatch",
            ConfigError::InvalidSpeed => "speeds must be positive",
            ConfigError::InvalidPollInterval => "poll interval must be non-zero",
            ConfigError::InvalidTimeout => "timeouts must be non-zero",
            ConfigError::InvalidRepeatCount => "repeat count must be non-zero",
            ConfigError::EmptyCycle => "cycle has no steps",
            ConfigError::InvalidValveLevels => "valve on and off levels are equal",
        };
        f.write_str(msg)
    }
}

/// Motion controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MotionConfig {
    /// Speed used when a move gives none
    pub default_speed: i32,
    /// Speed toward the home switches during homing
    pub homing_speed: i32,
    /// Time between supervision ticks in microseconds
    pub poll_interval_us: u32,
    /// Budget for one move before it is declared stalled
    pub move_timeout_ms: u32,
    /// Budget for a homing pass
    pub homing_timeout_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            default_speed: 512,
            homing_speed: 512,
            poll_interval_us: 1000,
            move_timeout_ms: 60_000,
            homing_timeout_ms: 120_000,
        }
    }
}

impl MotionConfig {
    /// Default speeds as a pair
    pub fn default_speeds(&self) -> Speeds {
        Speeds::uniform(self.default_speed)
    }
}

/// Gripper valve pair configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct GrabberConfig {
    /// Level for the energized valve
    pub on_level: u16,
    /// Level for the de-energized valve
    pub off_level: u16,
    /// Wait after switching the valves
    pub settle_ms: u32,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            on_level: 512,
            off_level: 0,
            settle_ms: 1000,
        }
    }
}

/// Grab cycle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct CycleConfig {
    /// Passes over `steps` per trigger
    pub repeat_count: u8,
    /// Ordered steps of one pass
    pub steps: Vec<CycleStep, MAX_CYCLE_STEPS>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            repeat_count: REPEAT_COUNT,
            steps: default_steps(),
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MachineConfig {
    /// Format version
    pub version: u8,
    pub motion: MotionConfig,
    pub grabber: GrabberConfig,
    pub cycle: CycleConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            motion: MotionConfig::default(),
            grabber: GrabberConfig::default(),
            cycle: CycleConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        let motion = &self.motion;
        if motion.default_speed <= 0 || motion.homing_speed <= 0 {
            return Err(ConfigError::InvalidSpeed);
        }
        if motion.poll_interval_us == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        if motion.move_timeout_ms == 0 || motion.homing_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if self.grabber.on_level == self.grabber.off_level {
            return Err(ConfigError::InvalidValveLevels);
        }

        if self.cycle.repeat_count == 0 {
            return Err(ConfigError::InvalidRepeatCount);
        }
        if self.cycle.steps.is_empty() {
            return Err(ConfigError::EmptyCycle);
        }
        for step in &self.cycle.steps {
            if let CycleStep::Move {
                speed_x, speed_z, ..
            } = step
            {
                let bad = |s: &Option<i32>| matches!(s, Some(v) if *v <= 0);
                if bad(speed_x) || bad(speed_z) {
                    return Err(ConfigError::InvalidSpeed);
                }
            }
        }

        Ok(())
    }
}
