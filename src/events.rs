//! Owner-context event queue.
//!
//! Events are produced by:
//! - the motion facility adapter (periodic deliveries)
//! - the one-shot timer adapter (activation checks)
//! - the presentation layer (start/stop commands)
//!
//! and consumed by the single context that owns the sampler, which applies
//! them one at a time in FIFO order.  This is the only path by which
//! platform callbacks reach [`SamplerState`](crate::fsm::context::SamplerState).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Motion      │────▶│              │     │              │
//! │ Timer       │────▶│  SPSC Queue  │────▶│  Owner Loop  │
//! │ UI command  │────▶│  (bounded)   │     │  (sampler)   │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::spsc::{Consumer, Producer, Queue};
use log::warn;

use crate::app::commands::SamplerCommand;
use crate::app::ports::MotionDelivery;
use crate::error::{Error, Result};
use crate::fsm::context::SessionId;

/// Queue slots.  One slot is reserved by the SPSC ring, so
/// `EVENT_QUEUE_CAP - 1` events can be pending at once.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Everything that can reach the sampler from outside the owner context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplerEvent {
    /// One periodic callback from the motion facility.
    Delivery {
        session: SessionId,
        delivery: MotionDelivery,
    },
    /// The delayed activation check for `session` is due.
    ActivationCheck { session: SessionId },
    /// A command from the presentation layer.
    Command(SamplerCommand),
}

pub type EventQueue = Queue<SamplerEvent, EVENT_QUEUE_CAP>;
pub type EventProducer<'a> = Producer<'a, SamplerEvent, EVENT_QUEUE_CAP>;
pub type EventConsumer<'a> = Consumer<'a, SamplerEvent, EVENT_QUEUE_CAP>;

/// Create an empty queue.  Call `split()` on it to obtain the producer
/// and consumer halves.
pub const fn new_queue() -> EventQueue {
    Queue::new()
}

/// Push an event into the queue.
/// Returns [`Error::QueueFull`] if there is no room (event dropped).
pub fn push_event(producer: &mut EventProducer<'_>, event: SamplerEvent) -> Result<()> {
    producer.enqueue(event).map_err(|dropped| {
        warn!("Event queue full, dropping {:?}", dropped);
        Error::QueueFull
    })
}

/// Drain all pending events into a callback, in FIFO order.
/// Returns the number of events handled.
pub fn drain_events(consumer: &mut EventConsumer<'_>, mut handler: impl FnMut(SamplerEvent)) -> usize {
    let mut handled = 0;
    while let Some(event) = consumer.dequeue() {
        handler(event);
        handled += 1;
    }
    handled
}
