//! Sampler configuration parameters
//!
//! All tunable parameters for the orientation sampler and its readout.
//! Values can be overridden from a JSON file through a
//! [`ConfigPort`](crate::app::ports::ConfigPort) adapter.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core sampler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    // --- Sampling ---
    /// Periodic attitude delivery rate requested from the motion facility (Hz)
    pub update_hz: u16,
    /// Delay after start before the facility's liveness flag is re-checked (ms)
    pub activation_grace_ms: u32,

    // --- Readout ---
    /// Pitch and roll must both be below this (radians) to count as level
    pub level_tolerance_rad: f64,
    /// Decimal places in the degree readout
    pub readout_decimals: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            update_hz: 60,
            activation_grace_ms: 200,
            level_tolerance_rad: 0.05,
            readout_decimals: 1,
        }
    }
}

impl SamplerConfig {
    /// Interval between periodic deliveries.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.update_hz.max(1)))
    }

    /// The activation grace window.
    pub fn activation_grace(&self) -> Duration {
        Duration::from_millis(u64::from(self.activation_grace_ms))
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_hz == 0 {
            return Err(ConfigError::ValidationFailed("update_hz must be > 0"));
        }
        if self.activation_grace_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "activation_grace_ms must be > 0",
            ));
        }
        if !self.level_tolerance_rad.is_finite() || self.level_tolerance_rad <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "level_tolerance_rad must be finite and > 0",
            ));
        }
        if self.readout_decimals > 6 {
            return Err(ConfigError::ValidationFailed("readout_decimals must be <= 6"));
        }
        Ok(())
    }
}
