//! Game state and core simulation types
//!
//! One `GameState` is one session: from the first tick until the player is
//! hit or runs out of platforms.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::EntityKind;
use super::player::Player;
use super::registry::{EntityId, Registry};
use super::spawn;
use super::sprites::SpriteBank;
use crate::consts::PLATFORM_LIST;
use crate::settings::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Touched an enemy
    EnemyHit,
    /// Every platform scrolled away (the player fell off the bottom)
    OutOfPlatforms,
}

/// Things that happened during the last tick, for frontends and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    /// Came down on a platform at the end of a jump
    Landed(EntityId),
    Boosted,
    PlatformPassed,
    EnemySpawned(EntityId),
    EnemyHit(EntityId),
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub bank: Rc<SpriteBank>,
    /// Distance climbed: one point per platform scrolled off the bottom
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock (ms); drives animation and enemy timers
    pub time_ms: u64,
    /// Clock reading at the last enemy spawn
    pub enemy_timer_ms: u64,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    pub player: Player,
    /// Platforms, power-ups, enemies and scenery
    pub registry: Registry,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, tuning: Tuning, bank: Rc<SpriteBank>) -> Self {
        let player = Player::new(&bank);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            bank,
            score: 0,
            time_ticks: 0,
            time_ms: 0,
            enemy_timer_ms: 0,
            phase: GamePhase::Playing,
            end_reason: None,
            player,
            registry: Registry::new(),
            events: Vec::new(),
        };

        for &(x, y) in PLATFORM_LIST.iter() {
            spawn::spawn_platform(&mut state, x, y);
        }

        state
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// End the run; the first reason recorded wins
    pub fn end(&mut self, reason: EndReason) {
        if self.end_reason.is_none() {
            self.end_reason = Some(reason);
        }
        self.phase = GamePhase::GameOver;
    }

    pub fn platform_count(&self) -> usize {
        self.registry.count(EntityKind::Platform)
    }
}
