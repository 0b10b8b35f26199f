//! The note stream: chart storage plus the active-note window.
//!
//! Notes live in an arena indexed by chart order; the active set is a
//! list of indices into it, kept in spawn order (ascending `time_ms`).
//! Mutation happens only between ticks, never during iteration.

use crate::model::{JudgeWindows, Note};

/// How far ahead of a note's target time it becomes active. Visual
/// lead only, not a judgment parameter.
pub const SPAWN_LEAD_MS: i64 = 2600;

/// How long a resolved note stays in the active set for display.
pub const RETIRE_MS: i64 = 800;

pub struct NoteStream {
    notes: Vec<Note>,
    /// Indices into `notes`, in spawn order.
    active: Vec<usize>,
    /// Next chart index to spawn. Never decreases within a run.
    next_index: usize,
    /// Late bound beyond which an untouched note auto-misses.
    miss_ms: i64,
    last_end_ms: i64,
}

impl NoteStream {
    /// Takes ownership of a chart's notes, already sorted by `time_ms`.
    pub fn new(notes: Vec<Note>, windows: &JudgeWindows) -> Self {
        let last_end_ms = notes.iter().map(|n| n.end_time_ms()).max().unwrap_or(0);
        Self {
            notes,
            active: Vec::new(),
            next_index: 0,
            miss_ms: windows.miss_ms,
            last_end_ms,
        }
    }

    /// Spawn every note whose lead window has been reached.
    pub fn advance(&mut self, now: i64) {
        while self.next_index < self.notes.len()
            && now >= self.notes[self.next_index].time_ms - SPAWN_LEAD_MS
        {
            self.active.push(self.next_index);
            self.next_index += 1;
        }
    }

    /// Resolve every active note that slipped past the miss bound
    /// without being hit or started. Returns the missed indices.
    /// Calling twice with the same `now` changes nothing the second
    /// time.
    pub fn sweep_auto_miss(&mut self, now: i64) -> Vec<usize> {
        let mut missed = Vec::new();
        for &idx in &self.active {
            let note = &self.notes[idx];
            if note.resolved || note.hold_started {
                continue;
            }
            if now - note.time_ms > self.miss_ms {
                missed.push(idx);
            }
        }
        for &idx in &missed {
            self.notes[idx].resolved = true;
        }
        missed
    }

    /// Drop resolved notes from the active set once they are past the
    /// display-retention window.
    pub fn retire(&mut self, now: i64) {
        let notes = &self.notes;
        self.active
            .retain(|&idx| !(notes[idx].resolved && now - notes[idx].time_ms > RETIRE_MS));
    }

    /// Active, unresolved, judgable notes in one lane, in chart order.
    /// Holds that have already been started are excluded.
    pub(crate) fn candidates(&self, lane: usize) -> impl Iterator<Item = (usize, &Note)> {
        self.active.iter().map(|&idx| (idx, &self.notes[idx])).filter(
            move |(_, note)| note.lane == lane && !note.resolved && !note.hold_started,
        )
    }

    pub fn note(&self, idx: usize) -> &Note {
        &self.notes[idx]
    }

    pub(crate) fn resolve(&mut self, idx: usize) {
        self.notes[idx].resolved = true;
    }

    pub(crate) fn start_hold(&mut self, idx: usize) {
        self.notes[idx].hold_started = true;
    }

    /// Rewind to the unplayed state for a fresh run of the same chart.
    pub fn reset(&mut self) {
        for note in &mut self.notes {
            note.resolved = false;
            note.hold_started = false;
        }
        self.active.clear();
        self.next_index = 0;
    }

    /// Whether every note has spawned and resolved.
    pub fn finished(&self) -> bool {
        self.next_index == self.notes.len() && self.notes.iter().all(|n| n.resolved)
    }

    /// End time of the latest-ending note, 0 for an empty chart.
    pub fn last_end_ms(&self) -> i64 {
        self.last_end_ms
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Everything currently spawned and retained, for drawing.
    pub fn active_notes(&self) -> impl Iterator<Item = (usize, &Note)> {
        self.active.iter().map(|&idx| (idx, &self.notes[idx]))
    }
}
