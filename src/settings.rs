//! Game settings and tuning
//!
//! Persisted as JSON. Every field has a default, so partial files work and a
//! missing or broken file just means default settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::highscores::HIGHSCORE_FILE;

/// Default settings file name
pub const SETTINGS_FILE: &str = "skyhop.json";

/// Gameplay balance. Velocities are pixels per tick, accelerations pixels
/// per tick squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration applied every tick
    pub gravity: f32,
    /// Horizontal acceleration while a direction key is held
    pub acceleration: f32,
    /// Horizontal damping factor (negative)
    pub friction: f32,
    /// Upward velocity at the start of a jump
    pub jump_power: f32,
    /// Upward velocity granted by a boost pickup
    pub boost_power: f32,
    /// Percent chance that a new platform carries a power-up
    pub powerup_spawn_pct: u32,
    /// Base time between enemy spawns (ms), before jitter
    pub enemy_interval_ms: u64,
    /// Percent chance per scrolling tick to add a background decoration
    pub background_spawn_pct: u32,
    /// Platform floor kept by the generator
    pub min_platforms: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            acceleration: 0.5,
            friction: -0.12,
            jump_power: 20.0,
            boost_power: 60.0,
            powerup_spawn_pct: 10,
            enemy_interval_ms: 5000,
            background_spawn_pct: 4,
            min_platforms: 6,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay balance
    pub tuning: Tuning,
    /// Target frame rate
    pub fps: u32,
    /// Where the best score is kept
    pub high_score_path: PathBuf,
    /// Sprite atlas image
    pub atlas_path: PathBuf,
    /// Fixed run seed (for reproducible sessions); random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            fps: FPS,
            high_score_path: PathBuf::from(HIGHSCORE_FILE),
            atlas_path: PathBuf::from("assets/spritesheet.png"),
            seed: None,
        }
    }
}

impl Settings {
    /// Milliseconds per simulation tick
    pub fn tick_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
