//! Test utilities for writing song directories and chart fixtures.

#[cfg(test)]
pub mod builders {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::chart::{ChartFile, ChartNote, SongMeta};
    use crate::model::{Difficulty, NoteKind};

    /// Write a song directory with a tap-only `6_normal` chart.
    /// `taps` is `(time_ms, lane)` pairs. Returns the song directory.
    pub fn write_song(
        root: &Path,
        artist: &str,
        name: &str,
        bpm: f64,
        offset_ms: i64,
        taps: &[(i64, usize)],
    ) -> PathBuf {
        let notes: Vec<ChartNote> = taps
            .iter()
            .map(|&(t_ms, lane)| ChartNote {
                t_ms,
                lane,
                kind: NoteKind::Tap,
                dur_ms: 0,
            })
            .collect();
        write_song_dir(root, artist, name, bpm, offset_ms, notes)
    }

    /// Like `write_song` but with holds: `(time_ms, lane, duration_ms)`.
    pub fn write_song_with_holds(
        root: &Path,
        artist: &str,
        name: &str,
        offset_ms: i64,
        taps: &[(i64, usize)],
        holds: &[(i64, usize, i64)],
    ) -> PathBuf {
        let mut notes: Vec<ChartNote> = taps
            .iter()
            .map(|&(t_ms, lane)| ChartNote {
                t_ms,
                lane,
                kind: NoteKind::Tap,
                dur_ms: 0,
            })
            .collect();
        notes.extend(holds.iter().map(|&(t_ms, lane, dur_ms)| ChartNote {
            t_ms,
            lane,
            kind: NoteKind::Hold,
            dur_ms,
        }));
        notes.sort_by_key(|n| n.t_ms);
        write_song_dir(root, artist, name, 120.0, offset_ms, notes)
    }

    fn write_song_dir(
        root: &Path,
        artist: &str,
        name: &str,
        bpm: f64,
        offset_ms: i64,
        notes: Vec<ChartNote>,
    ) -> PathBuf {
        let dir = root.join(artist).join(name);
        fs::create_dir_all(dir.join("charts")).unwrap();

        let meta = SongMeta {
            title: name.to_string(),
            artist: artist.to_string(),
            bpm,
            offset_ms,
        };
        meta.save_to(dir.join("meta.json")).unwrap();

        // Placeholder audio; tests drive playback through mocks.
        fs::write(dir.join("song.wav"), b"").unwrap();

        let chart = ChartFile {
            title: name.to_string(),
            artist: artist.to_string(),
            lanes: 6,
            difficulty: Difficulty::Normal,
            offset_ms: None,
            bpm,
            style: "vocal_first".to_string(),
            notes,
        };
        chart
            .save_to(dir.join("charts").join("6_normal.json"))
            .unwrap();
        dir
    }
}
