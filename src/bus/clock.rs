//! Time capability for the bus driver and the poll scheduler.
//!
//! Abstracting `now`/`sleep` behind a trait lets the tests substitute a
//! virtual clock and verify the exact per-step delays of the fetch sequence
//! without real hardware waits.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source with timed waits.
pub trait Clock {
    /// Time elapsed since this clock's origin.
    fn now(&self) -> Duration;

    /// Blocks the current flow of control for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock over std `Instant`.
///
/// OS sleep granularity is far too coarse for the bus timing, so waits below
/// a millisecond spin on `Instant` instead. The fetch sequence is a blocking
/// critical section either way; a delayed step mid-sequence corrupts the
/// read with no way to detect it.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if duration < Duration::from_millis(1) {
            let deadline = Instant::now() + duration;
            while Instant::now() < deadline {
                std::hint::spin_loop();
            }
        } else {
            thread::sleep(duration);
        }
    }
}
