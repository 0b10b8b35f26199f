// Presentation timer slots. Values are Option<i64> wall-clock
// milliseconds; None means the timer has not fired. Timers carry no
// gameplay authority — judgment never reads them.

/// Countdown start (session countdown and pause countdown share it).
pub const TIMER_COUNTDOWN: usize = 0;
/// "Go" flash after a countdown elapses.
pub const TIMER_GO: usize = 1;

// Per-lane slots: BASE + lane.
pub const TIMER_KEYON_BASE: usize = 10;
pub const TIMER_KEYOFF_BASE: usize = 20;
pub const TIMER_JUDGE_BASE: usize = 30;

const TIMER_COUNT: usize = 40;

/// How long a lane input flash stays lit.
pub const LANE_FLASH_MS: i64 = 120;

/// Named timer store queried by presentation.
#[derive(Debug, Clone)]
pub struct SessionTimers {
    timers: Vec<Option<i64>>,
}

impl Default for SessionTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimers {
    pub fn new() -> Self {
        Self {
            timers: vec![None; TIMER_COUNT],
        }
    }

    pub fn set(&mut self, id: usize, time_ms: i64) {
        if id < self.timers.len() {
            self.timers[id] = Some(time_ms);
        }
    }

    pub fn get(&self, id: usize) -> Option<i64> {
        self.timers.get(id).copied().flatten()
    }

    pub fn reset(&mut self, id: usize) {
        if id < self.timers.len() {
            self.timers[id] = None;
        }
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    /// Milliseconds since the timer fired, None when it has not.
    pub fn elapsed(&self, id: usize, now_ms: i64) -> Option<i64> {
        self.get(id).map(|start| now_ms - start)
    }

    /// Lane key-down flash. Clears the lane's key-off slot.
    pub fn set_key_on(&mut self, lane: usize, time_ms: i64) {
        self.set(TIMER_KEYON_BASE + lane, time_ms);
        self.reset(TIMER_KEYOFF_BASE + lane);
    }

    /// Lane key-up flash. Clears the lane's key-on slot.
    pub fn set_key_off(&mut self, lane: usize, time_ms: i64) {
        self.set(TIMER_KEYOFF_BASE + lane, time_ms);
        self.reset(TIMER_KEYON_BASE + lane);
    }

    /// Judge flash on a lane, restarted on every judged event.
    pub fn set_judge(&mut self, lane: usize, time_ms: i64) {
        self.set(TIMER_JUDGE_BASE + lane, time_ms);
    }

    /// Whether a lane's input flash is still within its display window.
    pub fn lane_flash_lit(&self, lane: usize, now_ms: i64) -> bool {
        self.elapsed(TIMER_KEYON_BASE + lane, now_ms)
            .is_some_and(|e| e <= LANE_FLASH_MS)
    }

    /// Clear every slot, used on navigation back to the select screen.
    pub fn clear(&mut self) {
        for slot in &mut self.timers {
            *slot = None;
        }
    }
}
