//! Song library scanning and loading.
//!
//! The library walks a two-level `songs/<artist>/<song>/` tree. A song
//! directory is anything containing a `meta.json`; its charts live under
//! `charts/<lanes>_<difficulty>.json` next to the audio file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chart::error::ChartError;
use crate::chart::model::{ChartFile, SongMeta};
use crate::model::{Difficulty, LaneCount, Note};

/// One discovered song directory.
#[derive(Debug, Clone)]
pub struct SongEntry {
    pub artist: String,
    pub name: String,
    pub dir: PathBuf,
}

impl SongEntry {
    pub fn meta_path(&self) -> PathBuf {
        self.dir.join("meta.json")
    }

    pub fn audio_path(&self) -> PathBuf {
        self.dir.join("song.wav")
    }

    pub fn chart_path(&self, lanes: LaneCount, difficulty: Difficulty) -> PathBuf {
        self.dir
            .join("charts")
            .join(format!("{}_{}.json", lanes.count(), difficulty.as_str()))
    }
}

/// A song with its chart resolved for one (lane count, difficulty) pair.
#[derive(Debug, Clone)]
pub struct LoadedSong {
    pub meta: SongMeta,
    pub notes: Vec<Note>,
    /// Effective audio offset: the chart's own value when present,
    /// otherwise the song meta value.
    pub offset_ms: i64,
    pub audio_path: PathBuf,
}

/// Scanned collection of songs, ordered by (artist, name).
#[derive(Debug, Clone, Default)]
pub struct SongLibrary {
    entries: Vec<SongEntry>,
}

impl SongLibrary {
    /// Scan a songs directory. Directories without a `meta.json` are
    /// skipped with a warning. A missing root yields an empty library.
    pub fn scan<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let mut entries = Vec::new();

        let artists = match fs::read_dir(root) {
            Ok(rd) => rd,
            Err(e) => {
                warn!("Songs directory {} not readable: {}", root.display(), e);
                return Self { entries };
            }
        };

        for artist_dir in artists.flatten() {
            let artist_path = artist_dir.path();
            if !artist_path.is_dir() {
                continue;
            }
            let artist = artist_dir.file_name().to_string_lossy().to_string();

            let songs = match fs::read_dir(&artist_path) {
                Ok(rd) => rd,
                Err(e) => {
                    warn!("Skipping {}: {}", artist_path.display(), e);
                    continue;
                }
            };

            for song_dir in songs.flatten() {
                let dir = song_dir.path();
                if !dir.is_dir() {
                    continue;
                }
                if !dir.join("meta.json").is_file() {
                    warn!("Skipping {} (no meta.json)", dir.display());
                    continue;
                }
                entries.push(SongEntry {
                    artist: artist.clone(),
                    name: song_dir.file_name().to_string_lossy().to_string(),
                    dir,
                });
            }
        }

        entries.sort_by(|a, b| (&a.artist, &a.name).cmp(&(&b.artist, &b.name)));
        info!("Found {} songs under {}", entries.len(), root.display());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SongEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&SongEntry, ChartError> {
        self.entries.get(index).ok_or(ChartError::SongIndex {
            index,
            count: self.entries.len(),
        })
    }

    /// Load one song's meta and the chart for the given lane count and
    /// difficulty. The chart's own offset wins over the meta offset.
    pub fn load(
        &self,
        index: usize,
        lanes: LaneCount,
        difficulty: Difficulty,
    ) -> Result<LoadedSong, ChartError> {
        let entry = self.entry(index)?;
        let meta = SongMeta::load_from(entry.meta_path())?;
        let chart = ChartFile::load_from(entry.chart_path(lanes, difficulty))?;
        chart.validate()?;

        let offset_ms = chart.offset_ms.unwrap_or(meta.offset_ms);
        let audio_path = entry.audio_path();
        let notes = chart.into_notes();
        info!(
            "Loaded {} - {} ({} lanes, {}): {} notes, offset {}ms",
            meta.artist,
            meta.title,
            lanes.count(),
            difficulty.as_str(),
            notes.len(),
            offset_ms
        );

        Ok(LoadedSong {
            meta,
            notes,
            offset_ms,
            audio_path,
        })
    }

    /// Persist a calibrated offset into the song's `meta.json`.
    pub fn save_offset(&self, index: usize, offset_ms: i64) -> Result<(), ChartError> {
        let entry = self.entry(index)?;
        let mut meta = SongMeta::load_from(entry.meta_path())?;
        meta.offset_ms = offset_ms;
        meta.save_to(entry.meta_path())?;
        info!(
            "Saved offset {}ms for {} - {}",
            offset_ms, entry.artist, entry.name
        );
        Ok(())
    }
}
