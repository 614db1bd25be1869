//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing sampler events to the `log` facade.
//! State snapshots arrive at the sampling rate, so they go to `trace`;
//! lifecycle events go to `info`/`warn`.

use log::{info, trace, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::StateUpdated(s) => {
                trace!(
                    "STATE | pitch={:.4} roll={:.4} active={}",
                    s.pitch, s.roll, s.is_active
                );
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(session) => {
                info!("START | session={}", session);
            }
            AppEvent::Stopped => {
                info!("STOP  | sampling halted");
            }
            AppEvent::SessionFailed(cause) => {
                warn!("FAIL  | {}", cause);
            }
        }
    }
}
