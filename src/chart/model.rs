//! On-disk chart and song metadata formats.
//!
//! A song directory holds a `meta.json` describing the track plus a
//! `charts/` directory with one JSON file per (lane count, difficulty)
//! pair, named `<lanes>_<difficulty>.json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::error::ChartError;
use crate::model::{Difficulty, Note, NoteKind};

/// Song-level metadata stored in `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub bpm: f64,
    /// Per-song audio offset in milliseconds, updated by calibration.
    #[serde(rename = "offsetMs", default)]
    pub offset_ms: i64,
}

impl SongMeta {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| ChartError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&data).map_err(|e| ChartError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ChartError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self).map_err(|e| ChartError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, data).map_err(|e| ChartError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn default_note_kind() -> NoteKind {
    NoteKind::Tap
}

/// One note as serialized in a chart file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartNote {
    #[serde(rename = "tMs")]
    pub t_ms: i64,
    pub lane: usize,
    #[serde(rename = "type", default = "default_note_kind")]
    pub kind: NoteKind,
    #[serde(rename = "durMs", default)]
    pub dur_ms: i64,
}

/// A complete chart file: header fields plus the note list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFile {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub lanes: usize,
    pub difficulty: Difficulty,
    /// Overrides the song meta offset when present.
    #[serde(rename = "offsetMs", default, skip_serializing_if = "Option::is_none")]
    pub offset_ms: Option<i64>,
    #[serde(default)]
    pub bpm: f64,
    #[serde(default)]
    pub style: String,
    pub notes: Vec<ChartNote>,
}

impl ChartFile {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| ChartError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let chart: ChartFile = serde_json::from_str(&data).map_err(|e| ChartError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(chart)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ChartError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self).map_err(|e| ChartError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, data).map_err(|e| ChartError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check structural invariants: lanes in range, monotonic times,
    /// positive hold durations.
    pub fn validate(&self) -> Result<(), ChartError> {
        let mut prev_ms = i64::MIN;
        for (index, note) in self.notes.iter().enumerate() {
            if note.lane >= self.lanes {
                return Err(ChartError::LaneOutOfRange {
                    index,
                    lane: note.lane,
                    lane_count: self.lanes,
                });
            }
            if note.t_ms < prev_ms {
                return Err(ChartError::NonMonotonic {
                    index,
                    time_ms: note.t_ms,
                });
            }
            if note.kind == NoteKind::Hold && note.dur_ms <= 0 {
                return Err(ChartError::BadHoldDuration {
                    index,
                    duration_ms: note.dur_ms,
                });
            }
            prev_ms = note.t_ms;
        }
        Ok(())
    }

    /// Convert to runtime notes, sorted by time. Sorting is stable so
    /// same-time notes keep their file order.
    pub fn into_notes(self) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .notes
            .into_iter()
            .map(|cn| match cn.kind {
                NoteKind::Tap => Note::tap(cn.lane, cn.t_ms),
                NoteKind::Hold => Note::hold(cn.lane, cn.t_ms, cn.dur_ms),
            })
            .collect();
        notes.sort_by_key(|n| n.time_ms);
        notes
    }
}
