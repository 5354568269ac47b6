//! Session lifecycle
//!
//! Start screen, then back-to-back sessions each followed by the game-over
//! screen, until the player quits. The frontend supplies input, presents
//! scenes and paces frames; everything else is decided here.

use std::io;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::highscores::HighScore;
use crate::render::{self, Scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, SpriteBank, TickInput, tick};

/// Input gathered for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Window close / quit key
    pub quit: bool,
    pub tick: TickInput,
}

/// How a blocking wait on a menu screen ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Key,
    Quit,
}

/// Input, display and clock collaborators
pub trait Frontend {
    /// Drain pending input for this frame
    fn poll_input(&mut self) -> io::Result<FrameInput>;
    /// Show a complete frame
    fn present(&mut self, scene: &Scene) -> io::Result<()>;
    /// Block until any key (or a quit request)
    fn wait_for_key(&mut self) -> io::Result<WaitOutcome>;
    /// Sleep out the remainder of the current frame
    fn end_frame(&mut self);
    /// What happened in the tick just run (sound cues, effects)
    fn on_events(&mut self, _events: &[GameEvent]) {}
}

/// Which screen is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

pub struct App {
    pub settings: Settings,
    bank: Rc<SpriteBank>,
    pub high_score: HighScore,
    /// Cleared by any quit request; ends the outer loop
    pub running: bool,
    pub screen: Screen,
    /// Sessions started so far
    pub sessions: u64,
}

impl App {
    pub fn new(settings: Settings, bank: Rc<SpriteBank>) -> Self {
        let high_score = HighScore::load(settings.high_score_path.clone());
        Self {
            settings,
            bank,
            high_score,
            running: true,
            screen: Screen::Start,
            sessions: 0,
        }
    }

    /// Run until the player quits
    pub fn run<F: Frontend>(&mut self, frontend: &mut F) -> io::Result<()> {
        self.screen = Screen::Start;
        frontend.present(&render::start_scene())?;
        if frontend.wait_for_key()? == WaitOutcome::Quit {
            self.running = false;
        }

        while self.running {
            let state = self.play(frontend)?;
            if !self.running {
                // Quit mid-session: no game-over screen, no high score
                break;
            }

            self.screen = Screen::GameOver;
            let scene = self.finish_session(state.score);
            frontend.present(&scene)?;
            if frontend.wait_for_key()? == WaitOutcome::Quit {
                self.running = false;
            }
        }

        log::info!("Exiting after {} session(s)", self.sessions);
        Ok(())
    }

    /// Fresh session; seeded from settings when fixed, else from the clock
    pub fn new_session(&mut self) -> GameState {
        let seed = match self.settings.seed {
            Some(seed) => seed.wrapping_add(self.sessions),
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        };
        self.sessions += 1;
        log::info!("Session {} started with seed {}", self.sessions, seed);
        GameState::new(seed, self.settings.tuning.clone(), Rc::clone(&self.bank))
    }

    /// Play one session to its end (or until quit)
    pub fn play<F: Frontend>(&mut self, frontend: &mut F) -> io::Result<GameState> {
        self.screen = Screen::Playing;
        let tick_ms = self.settings.tick_ms();
        let mut state = self.new_session();

        loop {
            let input = frontend.poll_input()?;
            if input.quit {
                self.running = false;
                break;
            }

            tick(&mut state, &input.tick, tick_ms);
            for event in &state.events {
                log::debug!("Tick {}: {:?}", state.time_ticks, event);
            }
            frontend.on_events(&state.events);
            frontend.present(&render::playing_scene(&state))?;
            frontend.end_frame();

            if state.is_over() {
                log::info!(
                    "Session over ({:?}) with score {}",
                    state.end_reason,
                    state.score
                );
                break;
            }
        }
        Ok(state)
    }

    /// Record the final score and build the game-over screen
    pub fn finish_session(&mut self, score: u64) -> Scene {
        let new_best = self.high_score.record(score);
        render::game_over_scene(score, self.high_score.best(), new_best)
    }
}
