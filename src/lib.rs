//! Skyhop - a vertical-scrolling platform jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `render`: Back-to-front draw lists for the active screen
//! - `app`: Session lifecycle (start screen, play, game over)
//! - `terminal`: crossterm frontend
//! - `settings`: Data-driven tuning and runtime configuration
//! - `highscores`: Best-score persistence

pub mod app;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;
pub mod terminal;

pub use highscores::HighScore;
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Logical viewport size (pixels)
    pub const WIDTH: f32 = 400.0;
    pub const HEIGHT: f32 = 600.0;

    /// Every atlas crop is scaled up by this factor
    pub const SPRITE_SCALE: u32 = 5;

    /// Target frame rate and the matching tick length
    pub const FPS: u32 = 60;
    pub const TICK_MS: u64 = 1000 / FPS as u64;

    /// Draw priorities (ascending = further in front)
    pub const BACKGROUND_LAYER: u8 = 0;
    pub const PLATFORM_LAYER: u8 = 1;
    pub const POWUP_LAYER: u8 = 2;
    pub const PLAYER_LAYER: u8 = 3;
    pub const ENEMY_LAYER: u8 = 4;

    /// Player spawn point (midbottom anchor)
    pub const PLAYER_START: (f32, f32) = (50.0, HEIGHT - 100.0);

    /// Platforms present when a session starts (top-left corners)
    pub const PLATFORM_LIST: [(f32, f32); 5] = [
        (0.0, HEIGHT - 60.0),
        (WIDTH / 2.0 - 50.0, HEIGHT * 3.0 / 4.0 - 50.0),
        (125.0, HEIGHT - 350.0),
        (350.0, 200.0),
        (175.0, 100.0),
    ];

    /// Player horizontal center may overhang a platform edge by this much and still land
    pub const LANDING_TOLERANCE: f32 = 14.0;
    /// Jump check shifts the player this far right before testing for ground
    pub const JUMP_NUDGE: f32 = 2.0;
    /// Jump-cut threshold and the velocity it clamps to
    pub const JUMP_CUT_THRESHOLD: f32 = -10.0;
    pub const JUMP_CUT_VELOCITY: f32 = 1.0;
    /// Horizontal speeds below this snap to zero
    pub const VELOCITY_SNAP: f32 = 0.1;

    /// Minimum scroll step once the camera is held
    pub const MIN_SCROLL: f32 = 2.0;
    /// Minimum upward push per tick while the player is below the screen
    pub const MIN_FALL_SCROLL: f32 = 10.0;

    /// Power-ups float this far above their platform
    pub const POWUP_GAP: f32 = 5.0;

    /// Enemies spawn this far beyond a side edge and die this far past the other
    pub const ENEMY_MARGIN: f32 = 100.0;
    /// Vertical oscillation bound and step for enemies
    pub const ENEMY_VY_LIMIT: f32 = 3.0;
    pub const ENEMY_DY: f32 = 0.5;
    /// Random jitter applied to the enemy spawn interval (ms)
    pub const ENEMY_JITTER_MS: [i64; 5] = [-1000, -500, 0, 500, 1000];

    /// Animation frame durations (ms)
    pub const WALK_FRAME_MS: u64 = 250;
    pub const STAND_FRAME_MS: u64 = 350;
    pub const JUMP_FRAME_MS: u64 = 200;
}

/// Wrap a horizontal coordinate around the viewport.
///
/// Reaching the right edge reappears at 0; leaving past the left edge
/// reappears at the right edge (which wraps to 0 on the next step).
#[inline]
pub fn wrap_x(x: f32) -> f32 {
    if x >= consts::WIDTH {
        0.0
    } else if x < 0.0 {
        consts::WIDTH
    } else {
        x
    }
}
