//! Per-lane key state tracked across ticks.

/// Edge-detecting state for one lane's key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneKey {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    pub press_time_ms: i64,
    pub release_time_ms: i64,
}

impl LaneKey {
    /// Register a key-down. Repeated downs without a release are
    /// ignored.
    pub fn on_press(&mut self, now_ms: i64) {
        if self.pressed {
            return;
        }
        self.pressed = true;
        self.just_pressed = true;
        self.press_time_ms = now_ms;
    }

    /// Register a key-up. Ignored when not pressed.
    pub fn on_release(&mut self, now_ms: i64) {
        if !self.pressed {
            return;
        }
        self.pressed = false;
        self.just_released = true;
        self.release_time_ms = now_ms;
    }

    /// Clear the per-tick edge flags. Call once at the start of each
    /// tick, before draining input.
    pub fn reset_frame_state(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Key state for every lane of the current chart.
#[derive(Debug, Clone, Default)]
pub struct LaneKeys {
    keys: Vec<LaneKey>,
}

impl LaneKeys {
    pub fn new(lane_count: usize) -> Self {
        Self {
            keys: vec![LaneKey::default(); lane_count],
        }
    }

    pub fn lane_count(&self) -> usize {
        self.keys.len()
    }

    pub fn on_press(&mut self, lane: usize, now_ms: i64) {
        if let Some(key) = self.keys.get_mut(lane) {
            key.on_press(now_ms);
        }
    }

    pub fn on_release(&mut self, lane: usize, now_ms: i64) {
        if let Some(key) = self.keys.get_mut(lane) {
            key.on_release(now_ms);
        }
    }

    pub fn is_down(&self, lane: usize) -> bool {
        self.keys.get(lane).is_some_and(|k| k.pressed)
    }

    pub fn get(&self, lane: usize) -> Option<&LaneKey> {
        self.keys.get(lane)
    }

    pub fn begin_frame(&mut self) {
        for key in &mut self.keys {
            key.reset_frame_state();
        }
    }

    /// Drop all state, including held keys.
    pub fn reset(&mut self) {
        for key in &mut self.keys {
            *key = LaneKey::default();
        }
    }
}
