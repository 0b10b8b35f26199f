//! Wall-clock abstraction for countdown and presentation timing.
//!
//! Song time is derived from the audio position, not from this clock.
//! The wall clock only drives things that must keep moving while audio
//! is stopped: countdowns, lane flashes, judge displays.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic wall-clock time in milliseconds.
pub trait WallClock {
    fn now_ms(&self) -> i64;
}

/// Real clock measured from construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for SystemClock {
    fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// Manually-driven clock for tests.
pub struct MockClock {
    now_ms: Cell<i64>,
}

impl MockClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.set(self.now_ms.get() + delta_ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl WallClock for MockClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}
