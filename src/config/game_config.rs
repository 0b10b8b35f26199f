use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::input::KeyMode;
use crate::model::{Difficulty, LaneCount};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Root of the `songs/<artist>/<song>` tree.
    pub songs_root: String,
    pub lane_count: LaneCount,
    pub difficulty: Difficulty,
    pub key_mode: KeyMode,
    /// Optional directory for rolling log files.
    pub log_dir: Option<String>,
    pub verbose: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            songs_root: "songs".to_string(),
            lane_count: LaneCount::Six,
            difficulty: Difficulty::Normal,
            key_mode: KeyMode::Keys,
            log_dir: None,
            verbose: false,
        }
    }
}

impl GameConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG_FILE)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
