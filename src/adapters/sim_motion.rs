//! Simulated motion facility.
//!
//! Implements [`MotionPort`] on the host so the sampler can run without a
//! sensor.  Produces a slow synthetic tilt at the requested interval and
//! can be configured to lack the capability, to never engage, or to
//! report a delivery error part-way through a session.
//!
//! The adapter is polled by the owner loop, which passes in the current
//! time and the queue producer; deliveries never call the sampler directly.

use core::f64::consts::TAU;
use core::time::Duration;

use log::{debug, info};

use crate::app::ports::{MotionDelivery, MotionPort};
use crate::error::Result;
use crate::events::{EventProducer, SamplerEvent, push_event};
use crate::fsm::context::{OrientationSample, SessionId};

/// Upper bound on deliveries per poll; missed ticks beyond it are skipped.
const MAX_CATCH_UP: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Registration {
    session: SessionId,
    interval_us: u64,
    started_us: u64,
    next_due_us: u64,
    fault_sent: bool,
}

/// Host-side stand-in for the platform motion facility.
#[derive(Debug, Clone)]
pub struct SimulatedMotion {
    available: bool,
    engages: bool,
    fault_after: Option<Duration>,
    /// Peak tilt on each axis (radians).
    amplitude_rad: f64,
    /// Period of the synthetic sway (seconds).
    period_secs: f64,
    now_us: u64,
    registration: Option<Registration>,
}

impl Default for SimulatedMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMotion {
    /// A capable facility that engages on request.
    pub fn new() -> Self {
        Self {
            available: true,
            engages: true,
            fault_after: None,
            amplitude_rad: 0.12,
            period_secs: 4.0,
            now_us: 0,
            registration: None,
        }
    }

    /// A device without motion sensing.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Accepts start requests but never actually engages.
    pub fn stalled() -> Self {
        Self {
            engages: false,
            ..Self::new()
        }
    }

    /// Report a delivery error `after` each session start.
    pub fn with_fault_after(mut self, after: Duration) -> Self {
        self.fault_after = Some(after);
        self
    }

    /// Session currently registered, if any.
    pub fn registered_session(&self) -> Option<SessionId> {
        self.registration.map(|r| r.session)
    }

    /// Advance to `now_us` and enqueue every delivery that has come due.
    /// Returns the number of deliveries enqueued.  Ticks the queue refused
    /// stay due for the next poll.
    pub fn poll(&mut self, now_us: u64, producer: &mut EventProducer<'_>) -> Result<usize> {
        self.now_us = self.now_us.max(now_us);
        if !self.engages {
            return Ok(0);
        }
        let Some(mut reg) = self.registration else {
            return Ok(0);
        };

        let mut sent = 0;
        while reg.next_due_us <= self.now_us && sent < MAX_CATCH_UP {
            let mut next = reg;
            let delivery = self.delivery_at(&mut next);
            push_event(
                producer,
                SamplerEvent::Delivery {
                    session: next.session,
                    delivery,
                },
            )?;
            // Commit the tick only once the queue has taken it.
            next.next_due_us += next.interval_us;
            reg = next;
            self.registration = Some(reg);
            sent += 1;
        }
        if reg.next_due_us <= self.now_us {
            let skipped = (self.now_us - reg.next_due_us) / reg.interval_us + 1;
            debug!("Simulated motion skipping {} late ticks", skipped);
            reg.next_due_us += skipped * reg.interval_us;
        }
        self.registration = Some(reg);
        Ok(sent)
    }

    fn delivery_at(&self, reg: &mut Registration) -> MotionDelivery {
        let elapsed_us = reg.next_due_us.saturating_sub(reg.started_us);
        if let Some(after) = self.fault_after {
            if !reg.fault_sent && u128::from(elapsed_us) >= after.as_micros() {
                reg.fault_sent = true;
                return MotionDelivery::Error("simulated sensor fault");
            }
        }

        let t = reg.next_due_us as f64 / 1_000_000.0;
        let phase = TAU * t / self.period_secs;
        MotionDelivery::Sample(OrientationSample::new(
            self.amplitude_rad * phase.sin(),
            0.5 * self.amplitude_rad * (phase * 0.7).cos(),
        ))
    }
}

impl MotionPort for SimulatedMotion {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start_updates(&mut self, interval: Duration, session: SessionId) {
        let interval_us = u64::try_from(interval.as_micros()).unwrap_or(u64::MAX).max(1);
        info!(
            "Simulated motion: session {} every {} us{}",
            session,
            interval_us,
            if self.engages { "" } else { " (will not engage)" }
        );
        self.registration = Some(Registration {
            session,
            interval_us,
            started_us: self.now_us,
            next_due_us: self.now_us + interval_us,
            fault_sent: false,
        });
    }

    fn stop_updates(&mut self) {
        if let Some(reg) = self.registration.take() {
            debug!("Simulated motion: session {} released", reg.session);
        }
    }

    fn is_active(&self) -> bool {
        self.engages && self.registration.is_some()
    }
}
