//! Outbound application events.
//!
//! The [`OrientationSampler`](super::service::OrientationSampler) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  A
//! presentation layer re-renders on `StateUpdated`; the log adapter turns
//! everything into serial-style log lines.

use crate::error::SamplerError;
use crate::fsm::Phase;
use crate::fsm::context::{SamplerState, SessionId};

/// Structured events emitted by the sampler.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The published state was mutated.  Carries the new snapshot.
    StateUpdated(SamplerState),

    /// The phase machine moved (re-entries included).
    PhaseChanged { from: Phase, to: Phase },

    /// A sampling session was opened with the facility.
    Started(SessionId),

    /// `stop()` was processed.
    Stopped,

    /// The current session ended in failure.
    SessionFailed(SamplerError),
}
