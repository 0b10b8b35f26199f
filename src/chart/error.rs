use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading, writing, or validating chart data.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Note {index} at {time_ms}ms is earlier than its predecessor")]
    NonMonotonic { index: usize, time_ms: i64 },

    #[error("Note {index} lane {lane} is out of range for {lane_count} lanes")]
    LaneOutOfRange {
        index: usize,
        lane: usize,
        lane_count: usize,
    },

    #[error("Hold note {index} has non-positive duration {duration_ms}ms")]
    BadHoldDuration { index: usize, duration_ms: i64 },

    #[error("Song index {index} out of range ({count} songs)")]
    SongIndex { index: usize, count: usize },
}
