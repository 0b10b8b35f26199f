//! In-flight hold note tracking.

use crate::input::LaneKeys;
use crate::play::stream::NoteStream;

/// Releasing this close to a hold's end still counts as a completion.
pub const RELEASE_GRACE_MS: i64 = 120;

/// Terminal result of one hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldOutcome {
    pub lane: usize,
    pub index: usize,
    pub success: bool,
}

/// Per-lane in-flight holds. At most one per lane; a lane with an
/// in-flight hold ignores further presses until it resolves.
pub struct HoldTracker {
    lanes: Vec<Option<usize>>,
}

impl HoldTracker {
    pub fn new(lane_count: usize) -> Self {
        Self {
            lanes: vec![None; lane_count],
        }
    }

    pub fn is_holding(&self, lane: usize) -> bool {
        self.lanes.get(lane).is_some_and(|slot| slot.is_some())
    }

    /// The chart index of the hold in flight on `lane`, if any.
    pub fn holding(&self, lane: usize) -> Option<usize> {
        self.lanes.get(lane).copied().flatten()
    }

    /// Attach a started hold to its lane.
    pub fn begin(&mut self, lane: usize, index: usize) {
        if let Some(slot) = self.lanes.get_mut(lane) {
            *slot = Some(index);
        }
    }

    /// Advance every in-flight hold one tick.
    ///
    /// A hold succeeds once `now` reaches its end, resolving the note.
    /// It fails if the key is up before the end minus the release
    /// grace. Between those, it simply stays lit.
    pub fn update(
        &mut self,
        stream: &mut NoteStream,
        keys: &LaneKeys,
        now: i64,
    ) -> Vec<HoldOutcome> {
        let mut outcomes = Vec::new();
        for lane in 0..self.lanes.len() {
            let Some(index) = self.lanes[lane] else {
                continue;
            };
            let end_ms = stream.note(index).end_time_ms();

            if now >= end_ms {
                stream.resolve(index);
                self.lanes[lane] = None;
                outcomes.push(HoldOutcome {
                    lane,
                    index,
                    success: true,
                });
            } else if !keys.is_down(lane) && now < end_ms - RELEASE_GRACE_MS {
                stream.resolve(index);
                self.lanes[lane] = None;
                outcomes.push(HoldOutcome {
                    lane,
                    index,
                    success: false,
                });
            }
        }
        outcomes
    }

    /// Drop all in-flight holds without resolving their notes. Used on
    /// navigation away from a run.
    pub fn clear(&mut self) {
        for slot in &mut self.lanes {
            *slot = None;
        }
    }
}
