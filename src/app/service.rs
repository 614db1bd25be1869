//! Orientation sampler: the hexagonal core.
//!
//! [`OrientationSampler`] owns the motion facility, the phase machine, and
//! the published [`SamplerState`].  All other I/O flows through port
//! traits injected at call sites, making the whole lifecycle testable with
//! mock adapters.
//!
//! ```text
//!  MotionPort ◀──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │  OrientationSampler     │
//!  TimerPort  ◀─── │  FSM · sessions · state │ ◀── SamplerEvent queue
//!                  └────────────────────────┘
//! ```
//!
//! Session tokens stand in for lifetime tracking: the facility registration
//! and the delayed activation check both carry the [`SessionId`] current
//! when they were issued, and anything that arrives for another session is
//! dropped.  Stopping or failing closes the session, so late callbacks
//! become no-ops.

use log::{debug, info, warn};

use crate::config::SamplerConfig;
use crate::error::SamplerError;
use crate::events::{EventConsumer, SamplerEvent, drain_events};
use crate::fsm::context::{OrientationSample, SamplerContext, SamplerState, SessionId};
use crate::fsm::states::build_phase_table;
use crate::fsm::{Fsm, Phase, Trigger};
use crate::readout::Readout;

use super::commands::SamplerCommand;
use super::events::AppEvent;
use super::ports::{EventSink, MotionDelivery, MotionPort, TimerPort};

// ───────────────────────────────────────────────────────────────
// OrientationSampler
// ───────────────────────────────────────────────────────────────

/// Wraps a motion facility and publishes a single "live orientation data"
/// signal plus the latest pitch/roll.
///
/// Dropping the sampler stops the facility exactly once.
pub struct OrientationSampler<M: MotionPort> {
    motion: M,
    fsm: Fsm,
    ctx: SamplerContext,
    config: SamplerConfig,
    /// Last issued session token.
    issued: SessionId,
    /// Session whose registration is currently held with the facility.
    open: Option<SessionId>,
}

impl<M: MotionPort> OrientationSampler<M> {
    /// Construct an idle sampler.  Does **not** touch the facility.
    pub fn new(motion: M, config: SamplerConfig) -> Self {
        let mut ctx = SamplerContext::new();
        let mut fsm = Fsm::new(build_phase_table(), Phase::Idle);
        fsm.start(&mut ctx);

        Self {
            motion,
            fsm,
            ctx,
            config,
            issued: SessionId::default(),
            open: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open a new sampling session.
    ///
    /// Any held registration is released first.  Without capability the
    /// sampler fails immediately; otherwise it registers periodic delivery
    /// and schedules the activation check.  Failures are also reported
    /// through `sink`, so callers may ignore the returned error.
    pub fn start(
        &mut self,
        timer: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> Result<SessionId, SamplerError> {
        let before = self.ctx.state;

        if let Some(prev) = self.open {
            info!("Restarting: releasing session {}", prev);
            self.release_registration();
        }

        if !self.motion.is_available() {
            let cause = SamplerError::CapabilityUnavailable;
            self.ctx.last_failure = Some(cause);
            self.dispatch(Trigger::Start { capable: false }, sink);
            sink.emit(&AppEvent::SessionFailed(cause));
            self.publish_if_changed(before, sink);
            return Err(cause);
        }

        self.issued = self.issued.next();
        let session = self.issued;
        self.dispatch(Trigger::Start { capable: true }, sink);

        self.open = Some(session);
        self.motion.start_updates(self.config.update_interval(), session);
        timer.schedule_activation_check(self.config.activation_grace(), session);

        info!(
            "Session {} started at {} Hz, activation check in {} ms",
            session, self.config.update_hz, self.config.activation_grace_ms
        );
        sink.emit(&AppEvent::Started(session));
        self.publish_if_changed(before, sink);
        Ok(session)
    }

    /// Halt periodic delivery and mark the sampler inactive.
    /// Unconditional and idempotent.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        let before = self.ctx.state;
        self.release_registration();
        self.dispatch(Trigger::Stop, sink);
        sink.emit(&AppEvent::Stopped);
        self.publish_if_changed(before, sink);
    }

    // ── Inbound events ────────────────────────────────────────

    /// Apply one periodic delivery from the facility.
    pub fn handle_delivery(
        &mut self,
        session: SessionId,
        delivery: MotionDelivery,
        sink: &mut impl EventSink,
    ) {
        if self.open != Some(session) {
            debug!("Dropping delivery from closed session {}", session);
            return;
        }
        debug_assert!(self.fsm.current_phase().is_sampling());

        match delivery {
            MotionDelivery::Empty => {
                self.dispatch(Trigger::Empty, sink);
            }
            MotionDelivery::Error(reason) => {
                self.fail(SamplerError::DeliveryError(reason), Trigger::DeliveryError, sink);
            }
            MotionDelivery::Sample(sample) => {
                self.dispatch(Trigger::Sample, sink);
                self.ctx.apply_sample(sample);
                sink.emit(&AppEvent::StateUpdated(self.ctx.state));
            }
        }
    }

    /// The delayed activation check for `session` is due.
    ///
    /// Fails the session if the facility's liveness flag is down, whether
    /// or not samples arrived before.  A session that is live by the
    /// facility's own account is left alone.
    pub fn handle_activation_check(&mut self, session: SessionId, sink: &mut impl EventSink) {
        if self.open != Some(session) {
            debug!("Ignoring activation check for closed session {}", session);
            return;
        }

        let facility_active = self.motion.is_active();
        if facility_active {
            debug!(
                "Session {} engaged ({} samples so far)",
                session, self.ctx.samples_in_session
            );
            self.dispatch(Trigger::ActivationCheck { facility_active }, sink);
            return;
        }

        self.fail(
            SamplerError::ActivationTimeout,
            Trigger::ActivationCheck { facility_active },
            sink,
        );
    }

    /// Process a presentation-layer command.
    pub fn handle_command(
        &mut self,
        cmd: SamplerCommand,
        timer: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            SamplerCommand::Start => self.start_reported(timer, sink),
            SamplerCommand::Stop => self.stop(sink),
            SamplerCommand::Toggle => {
                if self.is_active() {
                    self.stop(sink);
                } else {
                    self.start_reported(timer, sink);
                }
            }
        }
    }

    /// Route one queued event.
    pub fn handle_event(
        &mut self,
        event: SamplerEvent,
        timer: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        match event {
            SamplerEvent::Delivery { session, delivery } => {
                self.handle_delivery(session, delivery, sink);
            }
            SamplerEvent::ActivationCheck { session } => {
                self.handle_activation_check(session, sink);
            }
            SamplerEvent::Command(cmd) => self.handle_command(cmd, timer, sink),
        }
    }

    /// Drain the owner-context queue.  Returns the number of events applied.
    pub fn drain(
        &mut self,
        consumer: &mut EventConsumer<'_>,
        timer: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) -> usize {
        drain_events(consumer, |event| self.handle_event(event, timer, sink))
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the published state.
    pub fn state(&self) -> SamplerState {
        self.ctx.state
    }

    /// Whether live orientation data is currently flowing.
    pub fn is_active(&self) -> bool {
        self.ctx.state.is_active
    }

    /// Internal lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    /// Session currently registered with the facility, if any.
    pub fn open_session(&self) -> Option<SessionId> {
        self.open
    }

    /// Cause of the most recent failure since the last start.
    pub fn last_failure(&self) -> Option<SamplerError> {
        self.ctx.last_failure
    }

    /// Valid samples applied since the last start.
    pub fn samples_in_session(&self) -> u64 {
        self.ctx.samples_in_session
    }

    /// The most recent sample, as published.
    pub fn latest(&self) -> OrientationSample {
        OrientationSample::new(self.ctx.state.pitch, self.ctx.state.roll)
    }

    /// Presentation readout derived from the current state.
    pub fn readout(&self) -> Readout {
        Readout::from_state(&self.ctx.state, &self.config)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Mutable access for adapters that are polled by the owner loop.
    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_reported(&mut self, timer: &mut impl TimerPort, sink: &mut impl EventSink) {
        if let Err(e) = self.start(timer, sink) {
            debug!("Start command did not open a session: {}", e);
        }
    }

    /// Close the session with `cause`.
    fn fail(&mut self, cause: SamplerError, trigger: Trigger, sink: &mut impl EventSink) {
        let before = self.ctx.state;
        self.ctx.last_failure = Some(cause);
        self.release_registration();
        self.dispatch(trigger, sink);
        sink.emit(&AppEvent::SessionFailed(cause));
        self.publish_if_changed(before, sink);
    }

    fn release_registration(&mut self) {
        self.motion.stop_updates();
        self.open = None;
    }

    fn dispatch(&mut self, trigger: Trigger, sink: &mut impl EventSink) {
        if let Some((from, to)) = self.fsm.dispatch(trigger, &mut self.ctx) {
            sink.emit(&AppEvent::PhaseChanged { from, to });
        }
    }

    fn publish_if_changed(&self, before: SamplerState, sink: &mut impl EventSink) {
        if self.ctx.state != before {
            sink.emit(&AppEvent::StateUpdated(self.ctx.state));
        }
    }
}

impl<M: MotionPort> Drop for OrientationSampler<M> {
    fn drop(&mut self) {
        if let Some(session) = self.open {
            warn!("Sampler dropped with session {} open", session);
        }
        self.release_registration();
        self.fsm.dispatch(Trigger::Stop, &mut self.ctx);
    }
}
