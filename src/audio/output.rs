use std::path::Path;

use anyhow::{Context, Result};
use kira::AudioManager as KiraAudioManager;
use kira::AudioManagerSettings;
use kira::Tween;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use tracing::debug;

use crate::traits::audio::AudioOutput;

/// Real audio backend. One song is loaded and played at a time; the
/// playhead position drives the song clock.
pub struct KiraOutput {
    manager: KiraAudioManager,
    sound: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
}

impl KiraOutput {
    pub fn new() -> Result<Self> {
        let manager = KiraAudioManager::new(AudioManagerSettings::default())
            .context("Failed to create audio manager")?;

        Ok(Self {
            manager,
            sound: None,
            handle: None,
        })
    }
}

impl AudioOutput for KiraOutput {
    fn load(&mut self, path: &Path) -> Result<()> {
        let sound = StaticSoundData::from_file(path)
            .with_context(|| format!("Failed to load audio: {}", path.display()))?;
        self.stop()?;
        debug!("Loaded audio {}", path.display());
        self.sound = Some(sound);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if let Some(mut old) = self.handle.take() {
            old.stop(Tween::default());
        }
        let sound = self.sound.as_ref().context("No audio loaded")?;
        let handle = self
            .manager
            .play(sound.clone())
            .context("Failed to start playback")?;
        self.handle = Some(handle);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.as_mut() {
            handle.pause(Tween::default());
        }
        Ok(())
    }

    fn unpause(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.as_mut() {
            handle.resume(Tween::default());
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
        }
        Ok(())
    }

    fn position_ms(&self) -> i64 {
        match &self.handle {
            Some(handle) => (handle.position() * 1000.0) as i64,
            None => -1,
        }
    }
}
