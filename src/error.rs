//! Unified error types for the level-bubble core.
//!
//! Sampler failures are terminal for the current sampling session only.
//! They surface to consumers as `is_active == false`; the typed variants
//! below exist for logging and for callers that want to know the cause.
//! All variants are `Copy` so they can be stored in the sampler context and
//! carried through events without allocation.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sampling session failed.
    Sampler(SamplerError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The owner-context event queue is full; the event was dropped.
    QueueFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampler(e) => write!(f, "sampler: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::QueueFull => write!(f, "event queue full"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sampler errors
// ---------------------------------------------------------------------------

/// Why a sampling session ended without (or stopped) delivering live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// The device has no motion-sensing capability.
    CapabilityUnavailable,
    /// The facility reported an error mid-stream.
    DeliveryError(&'static str),
    /// The facility accepted the start request but never engaged within
    /// the activation grace window.
    ActivationTimeout,
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapabilityUnavailable => write!(f, "device motion is not available"),
            Self::DeliveryError(reason) => write!(f, "motion update error: {reason}"),
            Self::ActivationTimeout => {
                write!(f, "motion updates failed to start or stopped unexpectedly")
            }
        }
    }
}

impl std::error::Error for SamplerError {}

impl From<SamplerError> for Error {
    fn from(e: SamplerError) -> Self {
        Self::Sampler(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
