//! Online audio/input latency calibration.
//!
//! Scoring presses carry a signed timing error; batches of those errors
//! drive a small feedback step on the song-clock offset. Misses, early
//! presses, and hold completions never feed the controller — the first
//! two are not clean measurements and the last is not a discrete timing
//! event.

use tracing::debug;

/// Samples per correction step.
pub const CALIBRATION_BATCH: usize = 12;

/// Fraction of the mean error corrected per batch.
pub const CALIBRATION_GAIN: f64 = 0.35;

/// Hard clamp on a single offset step, in milliseconds.
pub const MAX_OFFSET_STEP_MS: i64 = 12;

/// Total samples before batch applications start requesting saves.
pub const PERSIST_AFTER_SAMPLES: usize = 36;

/// One completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationUpdate {
    /// Signed offset step, already clamped. May be zero.
    pub step_ms: i64,
    /// Whether the tuned offset should be written back to disk.
    pub persist: bool,
}

/// Accumulates timing errors and emits clamped offset corrections.
#[derive(Debug, Clone, Default)]
pub struct CalibrationController {
    window: Vec<i64>,
    total_samples: usize,
}

impl CalibrationController {
    pub fn new() -> Self {
        Self {
            window: Vec::with_capacity(CALIBRATION_BATCH),
            total_samples: 0,
        }
    }

    /// Feed one scoring press's signed error. Returns an update when
    /// this sample completes a batch; the window is cleared afterwards.
    pub fn record(&mut self, signed_error_ms: i64) -> Option<CalibrationUpdate> {
        self.window.push(signed_error_ms);
        self.total_samples += 1;
        if self.window.len() < CALIBRATION_BATCH {
            return None;
        }

        let mean = self.window.iter().sum::<i64>() as f64 / self.window.len() as f64;
        self.window.clear();

        // Positive mean error means presses land after the target, so
        // the computed song time must shrink.
        let step_ms = (-mean * CALIBRATION_GAIN).round() as i64;
        let step_ms = step_ms.clamp(-MAX_OFFSET_STEP_MS, MAX_OFFSET_STEP_MS);
        let persist = self.total_samples >= PERSIST_AFTER_SAMPLES;
        debug!(
            "Calibration batch: mean error {:.1}ms, step {}ms, persist {}",
            mean, step_ms, persist
        );
        Some(CalibrationUpdate { step_ms, persist })
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn pending_samples(&self) -> usize {
        self.window.len()
    }

    /// Drop everything for a new session.
    pub fn reset(&mut self) {
        self.window.clear();
        self.total_samples = 0;
    }
}
