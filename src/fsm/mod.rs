//! Function-pointer finite state machine for the sampler lifecycle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  PhaseTable                                              │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ Phase    │ on_enter  │ on_exit  │ on_trigger        │ │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Idle     │ fn(ctx)   │ -        │ fn(..)->Option<>  │ │
//! │  │ Starting │ fn(ctx)   │ -        │ fn(..)->Option<>  │ │
//! │  │ Live     │ fn(ctx)   │ fn(ctx)  │ fn(..)->Option<>  │ │
//! │  │ Failed   │ fn(ctx)   │ -        │ fn(..)->Option<>  │ │
//! │  └──────────┴───────────┴──────────┴───────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is event driven rather than ticked: every [`Trigger`] is
//! handed to the current phase's `on_trigger`.  If it returns
//! `Some(next)` the engine runs `on_exit` for the current phase, then
//! `on_enter` for the next.  Returning the current phase re-enters it
//! (used for restarts).  `is_active` is owned by the enter handlers and is
//! true only in [`Phase::Live`].

pub mod context;
pub mod states;

use context::SamplerContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Every lifecycle phase of the sampler.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Phase {
    /// Never started, or stopped.
    Idle = 0,
    /// Start requested, no valid sample yet.
    Starting = 1,
    /// Valid data flowing.
    Live = 2,
    /// Delivery error, missing capability, or activation failure.
    Failed = 3,
}

impl Phase {
    /// Number of phases; sizes the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `Phase`.  Out-of-range indices assert in
    /// debug builds and fall back to `Failed` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Starting,
            2 => Self::Live,
            3 => Self::Failed,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::Failed
            }
        }
    }

    /// Whether the facility registration belongs to an open session.
    pub fn is_sampling(self) -> bool {
        matches!(self, Self::Starting | Self::Live)
    }
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Inputs to the phase machine.  Session filtering happens before a
/// trigger reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `start()` was issued; `capable` is the facility capability check.
    Start { capable: bool },
    /// A valid orientation sample arrived.
    Sample,
    /// A periodic tick carried neither data nor an error.
    Empty,
    /// The facility reported an error.
    DeliveryError,
    /// The delayed activation check fired.
    ActivationCheck { facility_active: bool },
    /// `stop()` was issued.
    Stop,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type PhaseActionFn = fn(&mut SamplerContext);

/// Signature for the trigger handler.
/// Returns `Some(next)` to transition, or `None` to stay.
pub type PhaseTriggerFn = fn(&SamplerContext, Trigger) -> Option<Phase>;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_exit: Option<PhaseActionFn>,
    pub on_trigger: PhaseTriggerFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The phase machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [PhaseDescriptor; Phase::COUNT],
    /// Index of the current phase.
    current: usize,
    /// Transitions taken since construction.
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given table, starting in `initial`.
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    pub fn start(&mut self, ctx: &mut SamplerContext) {
        info!("Sampler FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one trigger to the current phase.
    ///
    /// Returns `Some((from, to))` if a transition (including a re-entry)
    /// happened.
    pub fn dispatch(&mut self, trigger: Trigger, ctx: &mut SamplerContext) -> Option<(Phase, Phase)> {
        let next = (self.table[self.current].on_trigger)(ctx, trigger)?;
        let from = self.current_phase();
        self.transition(next, ctx);
        Some((from, next))
    }

    /// The current phase.
    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    /// Transitions taken since construction (re-entries included).
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn transition(&mut self, next: Phase, ctx: &mut SamplerContext) {
        let next_idx = next as usize;

        info!(
            "Sampler transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
