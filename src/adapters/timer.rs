//! Polled one-shot timer adapter.
//!
//! Implements [`TimerPort`] for a host loop: a scheduled activation check
//! is held with its deadline and pushed into the owner-context queue by
//! [`SoftTimer::poll`] once due.
//!
//! Only the most recent check is kept.  A newer schedule always belongs to
//! a newer session, and the sampler ignores checks for superseded sessions
//! anyway.

use core::time::Duration;

use log::debug;

use crate::app::ports::TimerPort;
use crate::error::Result;
use crate::events::{EventProducer, SamplerEvent, push_event};
use crate::fsm::context::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCheck {
    due_us: u64,
    session: SessionId,
}

/// One-shot timer driven by the owner loop's clock.
#[derive(Debug, Default)]
pub struct SoftTimer {
    /// Last time seen by `poll`; schedules are relative to it.
    now_us: u64,
    pending: Option<PendingCheck>,
}

impl SoftTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now_us` and enqueue the pending check if it is due.
    /// Returns whether a check was enqueued.  On a full queue the check
    /// is kept and retried by the next poll.
    pub fn poll(&mut self, now_us: u64, producer: &mut EventProducer<'_>) -> Result<bool> {
        self.now_us = self.now_us.max(now_us);
        match self.pending {
            Some(check) if check.due_us <= self.now_us => {
                debug!("Activation check for session {} due", check.session);
                // Stays pending until the queue accepts it.
                push_event(
                    producer,
                    SamplerEvent::ActivationCheck {
                        session: check.session,
                    },
                )?;
                self.pending = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether a check is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl TimerPort for SoftTimer {
    fn schedule_activation_check(&mut self, delay: Duration, session: SessionId) {
        let delay_us = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.pending = Some(PendingCheck {
            due_us: self.now_us.saturating_add(delay_us),
            session,
        });
    }
}
