//! Port traits: the hexagonal boundary between the sampler and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ OrientationSampler (domain)
//! ```
//!
//! Driven adapters (motion facility, one-shot timer, event observers,
//! config storage) implement these traits.  The
//! [`OrientationSampler`](super::service::OrientationSampler) consumes them
//! via generics, so the domain core never touches a platform API directly.
//!
//! ## Execution context
//!
//! The sampler is single-writer.  Adapters that receive platform callbacks
//! on another context must not call into the sampler from there; they
//! enqueue a [`SamplerEvent`](crate::events::SamplerEvent) instead and the
//! owner context drains the queue.

use core::time::Duration;

use crate::config::SamplerConfig;
use crate::fsm::context::{OrientationSample, SessionId};

// ───────────────────────────────────────────────────────────────
// Motion port (driven adapter: sensor facility ↔ domain)
// ───────────────────────────────────────────────────────────────

/// What one periodic callback carries.  Never both a sample and an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionDelivery {
    /// A valid attitude reading.
    Sample(OrientationSample),
    /// A benign tick with no data.
    Empty,
    /// The facility reported an error.
    Error(&'static str),
}

/// The platform's motion-sensing facility.
pub trait MotionPort {
    /// Whether the device can provide attitude data at all.
    fn is_available(&self) -> bool;

    /// Begin periodic delivery at `interval`.  Every delivery produced by
    /// this registration must be tagged with `session`.  Replaces any
    /// previous registration.
    fn start_updates(&mut self, interval: Duration, session: SessionId);

    /// Stop periodic delivery.  Must be safe to call when not started.
    fn stop_updates(&mut self);

    /// The facility's own liveness flag.
    fn is_active(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → one-shot scheduler)
// ───────────────────────────────────────────────────────────────

/// One-shot delayed callbacks.
pub trait TimerPort {
    /// Arrange for an
    /// [`ActivationCheck`](crate::events::SamplerEvent::ActivationCheck)
    /// tagged with `session` to reach the sampler after `delay`.
    fn schedule_activation_check(&mut self, delay: Duration, session: SessionId);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → observers / logging)
// ───────────────────────────────────────────────────────────────

/// Observers receive every [`AppEvent`](super::events::AppEvent), including
/// a `StateUpdated` snapshot after each mutation of the sampler state.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists sampler configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`SamplerConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SamplerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SamplerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
