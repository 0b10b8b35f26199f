use serde::{Deserialize, Serialize};

/// Kind of a scheduled note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// A single press on the target time.
    Tap,
    /// A press held from the target time through the end of the duration.
    Hold,
}

/// One scheduled gameplay event, fixed at chart-author time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    /// Target song time in milliseconds.
    pub time_ms: i64,
    /// Lane index, `0 <= lane < lane_count`.
    pub lane: usize,
    /// Tap or hold.
    pub kind: NoteKind,
    /// Hold length in milliseconds (0 for taps).
    pub duration_ms: i64,
    /// One-way latch: set by judgment, hold resolution, or the auto-miss
    /// sweep; never cleared within a run.
    pub resolved: bool,
    /// Set when a hold head press lands in-window.
    pub hold_started: bool,
}

impl Note {
    /// Create a tap note.
    pub fn tap(lane: usize, time_ms: i64) -> Self {
        Self {
            time_ms,
            lane,
            kind: NoteKind::Tap,
            duration_ms: 0,
            resolved: false,
            hold_started: false,
        }
    }

    /// Create a hold note.
    pub fn hold(lane: usize, time_ms: i64, duration_ms: i64) -> Self {
        Self {
            time_ms,
            lane,
            kind: NoteKind::Hold,
            duration_ms,
            resolved: false,
            hold_started: false,
        }
    }

    /// End of the note's input span. Equals `time_ms` for taps.
    pub fn end_time_ms(&self) -> i64 {
        self.time_ms + self.duration_ms
    }

    pub fn is_hold(&self) -> bool {
        self.kind == NoteKind::Hold
    }
}

/// Number of playable lanes for the current chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneCount {
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
}

impl LaneCount {
    pub fn count(&self) -> usize {
        match self {
            LaneCount::Five => 5,
            LaneCount::Six => 6,
        }
    }

    /// The other supported lane count.
    pub fn toggled(&self) -> Self {
        match self {
            LaneCount::Five => LaneCount::Six,
            LaneCount::Six => LaneCount::Five,
        }
    }
}

impl Default for LaneCount {
    fn default() -> Self {
        LaneCount::Six
    }
}

/// Chart difficulty tier. Charts are stored per (lane count, difficulty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// All difficulties in ascending order.
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}
