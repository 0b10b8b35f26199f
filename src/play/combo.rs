//! Hit-streak tracking.

/// Consecutive-success counter plus the session-best streak.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComboTracker {
    combo: u32,
    max_combo: u32,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scoring judgment landed.
    pub fn on_success(&mut self) {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
    }

    /// A miss, dropped hold, or empty press broke the chain.
    pub fn on_failure(&mut self) {
        self.combo = 0;
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Clear both counters for a new run.
    pub fn reset(&mut self) {
        self.combo = 0;
        self.max_combo = 0;
    }
}
