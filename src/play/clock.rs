//! Song time derivation.

use crate::traits::audio::AudioOutput;

/// Converts the raw audio playhead into authoritative song time.
///
/// All judgment, spawning, and hold resolution read time through this
/// type; nothing else may read the audio position directly. The offset
/// is the calibration correction, seeded from the chart and nudged by
/// the calibration controller.
#[derive(Debug, Clone, Copy)]
pub struct SongClock {
    offset_ms: i64,
}

impl SongClock {
    pub fn new(offset_ms: i64) -> Self {
        Self { offset_ms }
    }

    /// Current song time in milliseconds. The raw position can be
    /// negative or stale right after load/play; it is clamped to zero
    /// before the offset is applied.
    pub fn now(&self, audio: &dyn AudioOutput) -> i64 {
        audio.position_ms().max(0) + self.offset_ms
    }

    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Apply a calibration step.
    pub fn nudge(&mut self, step_ms: i64) {
        self.offset_ms += step_ms;
    }

    /// Replace the offset wholesale, used when a new chart is loaded.
    pub fn reseed(&mut self, offset_ms: i64) {
        self.offset_ms = offset_ms;
    }
}
