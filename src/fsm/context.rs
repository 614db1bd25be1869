//! Shared mutable context threaded through every phase handler.
//!
//! `SamplerContext` holds the published [`SamplerState`] plus the
//! bookkeeping the phase handlers need.  Only the sampler writes to it;
//! everyone else sees `Copy` snapshots.

use core::fmt;

use serde::Serialize;

use crate::error::SamplerError;

// ---------------------------------------------------------------------------
// Orientation sample (produced by the motion facility)
// ---------------------------------------------------------------------------

/// One attitude reading.  Angles are in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrientationSample {
    /// Rotation about the lateral axis (forward/backward tilt).
    pub pitch: f64,
    /// Rotation about the longitudinal axis (left/right tilt).
    pub roll: f64,
}

impl OrientationSample {
    pub const fn new(pitch: f64, roll: f64) -> Self {
        Self { pitch, roll }
    }
}

// ---------------------------------------------------------------------------
// Published state (read-only to consumers)
// ---------------------------------------------------------------------------

/// The externally observable sampler state.
///
/// `pitch`/`roll` hold the most recent sample and are only meaningful for
/// live display while `is_active` is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SamplerState {
    pub pitch: f64,
    pub roll: f64,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Session identity
// ---------------------------------------------------------------------------

/// Generation token for one sampling session.
///
/// Issued fresh on every start and captured by the facility registration
/// and the delayed activation check.  Anything tagged with a superseded
/// token is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub u32);

impl SessionId {
    /// The token that follows this one.  Wraps at `u32::MAX`.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SamplerContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler.
#[derive(Debug, Default)]
pub struct SamplerContext {
    /// Published snapshot.
    pub state: SamplerState,
    /// Cause of the most recent failure, cleared on the next start.
    pub last_failure: Option<SamplerError>,
    /// Valid samples applied since the last start.
    pub samples_in_session: u64,
}

impl SamplerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the latest readings.
    pub fn apply_sample(&mut self, sample: OrientationSample) {
        self.state.pitch = sample.pitch;
        self.state.roll = sample.roll;
        self.samples_in_session += 1;
    }
}
