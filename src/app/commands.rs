//! Inbound commands to the sampler.
//!
//! These are what a presentation layer (start/stop button, screen
//! appear/disappear hooks) asks the
//! [`OrientationSampler`](super::service::OrientationSampler) to do.

/// Commands that external adapters can send into the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerCommand {
    /// Open a new sampling session.
    Start,

    /// Halt sampling.  Idempotent.
    Stop,

    /// Stop if currently live, start otherwise.
    Toggle,
}
