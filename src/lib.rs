//! LevelBubble orientation sampler library.
//!
//! Exposes the sampler core, its port traits, and the host adapters for
//! integration testing and for front ends that render the level bubble.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod readout;

pub use app::service::OrientationSampler;
pub use error::{Error, Result, SamplerError};
pub use fsm::Phase;
pub use fsm::context::{OrientationSample, SamplerState, SessionId};
