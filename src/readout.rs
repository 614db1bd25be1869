//! Presentation derivations.
//!
//! What a front end shows for a [`SamplerState`]: angles in degrees with a
//! fixed number of decimals, and whether the device is level.  Readings
//! from an inactive sampler are never reported as level.

use core::fmt;

use crate::config::SamplerConfig;
use crate::fsm::context::SamplerState;

/// Radians to degrees.
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / core::f64::consts::PI
}

/// Format an angle given in radians as degrees, e.g. `"-11.5°"`.
pub fn format_degrees(radians: f64, decimals: u8) -> String {
    format!("{:.*}\u{00b0}", usize::from(decimals), to_degrees(radians))
}

/// Level when both axes are inside `tolerance` and the data is live.
pub fn is_level(state: &SamplerState, tolerance_rad: f64) -> bool {
    state.is_active && state.pitch.abs() < tolerance_rad && state.roll.abs() < tolerance_rad
}

/// Label for the start/stop control.
pub fn toggle_label(is_active: bool) -> &'static str {
    if is_active { "Stop" } else { "Start" }
}

/// A display-ready view of one state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub pitch_deg: f64,
    pub roll_deg: f64,
    pub level: bool,
    pub is_active: bool,
    decimals: u8,
}

impl Readout {
    pub fn from_state(state: &SamplerState, config: &SamplerConfig) -> Self {
        Self {
            pitch_deg: to_degrees(state.pitch),
            roll_deg: to_degrees(state.roll),
            level: is_level(state, config.level_tolerance_rad),
            is_active: state.is_active,
            decimals: config.readout_decimals,
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = usize::from(self.decimals);
        write!(
            f,
            "pitch={:.*}\u{00b0} roll={:.*}\u{00b0}",
            d, self.pitch_deg, d, self.roll_deg
        )?;
        if self.level {
            write!(f, " LEVEL")?;
        }
        if !self.is_active {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}
