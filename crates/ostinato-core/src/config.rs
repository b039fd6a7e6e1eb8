//! Engine configuration shared by the real-time stages.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest block a real-time stage processes per callback.
///
/// Power of two so per-block circular indices can wrap with a mask.
pub const MAX_BLOCK_LENGTH: usize = 1024;

const _: () = assert!(MAX_BLOCK_LENGTH.is_power_of_two());

/// Highest real-time priority level a caller may request.
///
/// Half of the POSIX round-robin range, so an audio thread can never take the
/// very top of the scheduler.
pub const MAX_PRIORITY_LEVEL: u8 = 49;

/// Configuration for the real-time engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: f64,
    /// Requested RT priority for the audio thread. `0` leaves scheduling alone.
    pub rt_priority_level: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            rt_priority_level: 1,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000.0..=384000.0).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.rt_priority_level > MAX_PRIORITY_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "rt_priority_level {} above maximum {}",
                self.rt_priority_level, MAX_PRIORITY_LEVEL
            )));
        }
        Ok(())
    }
}
