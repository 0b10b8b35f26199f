//! Input abstraction.
//!
//! The session consumes lane-level events; mapping physical keys to
//! lanes happens outside (see `input::keymap`).

use std::collections::VecDeque;

/// One lane press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEvent {
    pub lane: usize,
    pub is_down: bool,
}

impl LaneEvent {
    pub fn down(lane: usize) -> Self {
        Self {
            lane,
            is_down: true,
        }
    }

    pub fn up(lane: usize) -> Self {
        Self {
            lane,
            is_down: false,
        }
    }
}

/// Source of lane events, drained once per tick in arrival order.
pub trait InputSource {
    fn poll_events(&mut self) -> Vec<LaneEvent>;
}

/// Test input that replays one queued frame of events per poll.
pub struct ScriptedInput {
    frames: VecDeque<Vec<LaneEvent>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }

    /// Queue a whole frame of events.
    pub fn push_frame(&mut self, events: Vec<LaneEvent>) {
        self.frames.push_back(events);
    }

    /// Queue a frame containing a single press.
    pub fn press(&mut self, lane: usize) {
        self.push_frame(vec![LaneEvent::down(lane)]);
    }

    /// Queue a frame containing a single release.
    pub fn release(&mut self, lane: usize) {
        self.push_frame(vec![LaneEvent::up(lane)]);
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<LaneEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}
