//! Concrete phase handler functions and table builder.
//!
//! ```text
//!  IDLE ──[start]──▶ STARTING ──[sample]──▶ LIVE ◀─┐
//!   ▲                   │                    │  └──[sample]
//!   │            [error | check fails]  [error | check fails]
//!   │                   ▼                    │
//!   │                 FAILED ◀───────────────┘
//!   │
//!   └────────────[stop]──── any phase
//!
//!  any phase ──[start, no capability]──▶ FAILED
//!  LIVE | FAILED | STARTING ──[start]──▶ STARTING
//! ```

use super::context::SamplerContext;
use super::{Phase, PhaseDescriptor, Trigger};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once per sampler.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        // 0: Idle
        PhaseDescriptor {
            id: Phase::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_trigger: idle_trigger,
        },
        // 1: Starting
        PhaseDescriptor {
            id: Phase::Starting,
            name: "Starting",
            on_enter: Some(starting_enter),
            on_exit: None,
            on_trigger: starting_trigger,
        },
        // 2: Live
        PhaseDescriptor {
            id: Phase::Live,
            name: "Live",
            on_enter: Some(live_enter),
            on_exit: Some(live_exit),
            on_trigger: live_trigger,
        },
        // 3: Failed
        PhaseDescriptor {
            id: Phase::Failed,
            name: "Failed",
            on_enter: Some(failed_enter),
            on_exit: None,
            on_trigger: failed_trigger,
        },
    ]
}

/// Start is handled the same way from every phase.
fn on_start(capable: bool) -> Phase {
    if capable { Phase::Starting } else { Phase::Failed }
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SamplerContext) {
    ctx.state.is_active = false;
}

fn idle_trigger(_ctx: &SamplerContext, trigger: Trigger) -> Option<Phase> {
    match trigger {
        Trigger::Start { capable } => Some(on_start(capable)),
        // Deliveries and checks cannot reach an idle sampler through an
        // open session; stop is already satisfied.
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTING: registration issued, waiting for the first valid sample
// ═══════════════════════════════════════════════════════════════════════════

fn starting_enter(ctx: &mut SamplerContext) {
    // Only a delivered sample may raise is_active.
    ctx.state.is_active = false;
    ctx.samples_in_session = 0;
    ctx.last_failure = None;
}

fn starting_trigger(_ctx: &SamplerContext, trigger: Trigger) -> Option<Phase> {
    match trigger {
        Trigger::Start { capable } => Some(on_start(capable)),
        Trigger::Sample => Some(Phase::Live),
        Trigger::DeliveryError | Trigger::ActivationCheck { facility_active: false } => {
            Some(Phase::Failed)
        }
        Trigger::Stop => Some(Phase::Idle),
        Trigger::Empty | Trigger::ActivationCheck { facility_active: true } => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LIVE: valid data flowing
// ═══════════════════════════════════════════════════════════════════════════

fn live_enter(ctx: &mut SamplerContext) {
    ctx.state.is_active = true;
    info!("LIVE: receiving motion data");
}

fn live_exit(ctx: &mut SamplerContext) {
    ctx.state.is_active = false;
    info!(
        "LIVE: left after {} samples (pitch={:.3} roll={:.3})",
        ctx.samples_in_session, ctx.state.pitch, ctx.state.roll
    );
}

fn live_trigger(_ctx: &SamplerContext, trigger: Trigger) -> Option<Phase> {
    match trigger {
        Trigger::Start { capable } => Some(on_start(capable)),
        Trigger::DeliveryError | Trigger::ActivationCheck { facility_active: false } => {
            Some(Phase::Failed)
        }
        Trigger::Stop => Some(Phase::Idle),
        // Refreshing the readings is not a transition.
        Trigger::Sample | Trigger::Empty | Trigger::ActivationCheck { facility_active: true } => {
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAILED: terminal for this session, not for the process
// ═══════════════════════════════════════════════════════════════════════════

fn failed_enter(ctx: &mut SamplerContext) {
    ctx.state.is_active = false;
    match ctx.last_failure {
        Some(cause) => warn!("FAILED: {cause}"),
        None => warn!("FAILED: sampling session ended"),
    }
}

fn failed_trigger(_ctx: &SamplerContext, trigger: Trigger) -> Option<Phase> {
    match trigger {
        Trigger::Start { capable } => Some(on_start(capable)),
        Trigger::Stop => Some(Phase::Idle),
        // Samples after a failure are ignored until the next start.
        _ => None,
    }
}
