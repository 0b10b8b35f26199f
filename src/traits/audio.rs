//! Audio playback abstraction.
//!
//! The session never talks to the audio backend directly except through
//! this trait; the song clock derives all note timing from
//! `position_ms`, which keeps tests free of real audio devices.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Playback control plus a position query.
///
/// `position_ms` may return a negative or stale value right after
/// `load`/`play`; callers clamp. It must be monotonic while playing.
pub trait AudioOutput {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn unpause(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn position_ms(&self) -> i64;
}

/// Scriptable backend for tests. Position is set by hand.
pub struct MockAudio {
    position_ms: Cell<i64>,
    playing: Cell<bool>,
    loaded: RefCell<Option<PathBuf>>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self {
            position_ms: Cell::new(-1),
            playing: Cell::new(false),
            loaded: RefCell::new(None),
        }
    }

    pub fn set_position(&self, position_ms: i64) {
        self.position_ms.set(position_ms);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.position_ms.set(self.position_ms.get() + delta_ms);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn loaded_path(&self) -> Option<PathBuf> {
        self.loaded.borrow().clone()
    }
}

impl Default for MockAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for MockAudio {
    fn load(&mut self, path: &Path) -> Result<()> {
        *self.loaded.borrow_mut() = Some(path.to_path_buf());
        self.position_ms.set(-1);
        self.playing.set(false);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.position_ms.set(0);
        self.playing.set(true);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing.set(false);
        Ok(())
    }

    fn unpause(&mut self) -> Result<()> {
        self.playing.set(true);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.playing.set(false);
        self.position_ms.set(-1);
        Ok(())
    }

    fn position_ms(&self) -> i64 {
        self.position_ms.get()
    }
}
