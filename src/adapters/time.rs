//! Monotonic clock adapter.
//!
//! Wraps `std::time::Instant` so the owner loop and the polled adapters
//! agree on one microsecond timeline starting at construction.

use std::time::Instant;

/// Microsecond clock used to drive the polled adapters.
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Microseconds since construction (monotonic).
    pub fn uptime_us(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Seconds since construction.
    pub fn uptime_secs_f64(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
