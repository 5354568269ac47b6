//! Best-score persistence
//!
//! A single plain-text file holding one integer. Read once at startup and
//! rewritten whenever a run beats it.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Default high score file name
pub const HIGHSCORE_FILE: &str = "highscore.txt";

#[derive(Debug, Clone)]
pub struct HighScore {
    path: PathBuf,
    best: u64,
}

impl HighScore {
    /// Read the stored best score. A missing or unreadable file counts as 0.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(score) => {
                    log::info!("High score {} loaded from {}", score, path.display());
                    score
                }
                Err(_) => {
                    log::warn!("Corrupt high score file {}, starting at 0", path.display());
                    0
                }
            },
            Err(_) => {
                log::info!("No high score at {}, starting at 0", path.display());
                0
            }
        };
        Self { path, best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether a finished run's score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true (and persists) if it is a new best.
    /// A failed write is logged; the in-memory best still updates.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = self.save() {
            log::warn!("Could not save high score to {}: {}", self.path.display(), e);
        } else {
            log::info!("New high score {}", score);
        }
        true
    }

    pub fn save(&self) -> io::Result<()> {
        fs::write(&self.path, self.best.to_string())
    }
}
