//! The player: physics integration, jumping and frame animation

use glam::Vec2;

use super::rect::Rect;
use super::sprites::{SpriteBank, SpriteId};
use crate::consts::*;
use crate::settings::Tuning;
use crate::wrap_x;

/// Which frame sequence is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Standing,
    Walking,
    Jumping,
}

impl AnimState {
    pub fn frames(self) -> &'static [SpriteId] {
        match self {
            AnimState::Standing => &SpriteId::STANDING,
            AnimState::Walking => &SpriteId::WALKING,
            AnimState::Jumping => &SpriteId::JUMPING,
        }
    }

    pub fn frame_ms(self) -> u64 {
        match self {
            AnimState::Standing => STAND_FRAME_MS,
            AnimState::Walking => WALK_FRAME_MS,
            AnimState::Jumping => JUMP_FRAME_MS,
        }
    }
}

/// The player sprite. `pos` is the midbottom anchor of its rect.
///
/// The rect is re-derived from `pos` once per tick, after integration, so
/// adjustments made later in the tick (landing snap, scrolling) show up in
/// collisions on the following tick.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub jumping: bool,
    pub walking: bool,
    /// Active frame and whether it is mirrored (facing left)
    pub sprite: SpriteId,
    pub flipped: bool,
    current_frame: usize,
    last_update_ms: u64,
    size: Vec2,
    rect: Rect,
}

impl Player {
    pub fn new(bank: &SpriteBank) -> Self {
        let sprite = SpriteId::STANDING[0];
        let mut player = Self {
            pos: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            jumping: false,
            walking: false,
            sprite,
            flipped: false,
            current_frame: 0,
            last_update_ms: 0,
            size: bank.size(sprite),
            rect: Rect::default(),
        };
        player.sync_rect();
        player
    }

    /// Bounding rect as of the last sync
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Re-anchor the rect at `pos` (bottom-center) with the current frame size
    pub fn sync_rect(&mut self) {
        self.rect = Rect::from_midbottom(self.pos, self.size);
    }

    pub fn anim_state(&self) -> AnimState {
        if self.jumping {
            AnimState::Jumping
        } else if self.vel.x != 0.0 {
            AnimState::Walking
        } else {
            AnimState::Standing
        }
    }

    /// Advance the frame animation against the simulation clock
    pub fn animate(&mut self, now_ms: u64, bank: &SpriteBank) {
        self.walking = self.vel.x != 0.0;
        let state = self.anim_state();
        if now_ms.saturating_sub(self.last_update_ms) <= state.frame_ms() {
            return;
        }
        self.last_update_ms = now_ms;

        let frames = state.frames();
        self.current_frame = (self.current_frame + 1) % frames.len();
        self.sprite = frames[self.current_frame];
        self.flipped = state != AnimState::Standing && self.vel.x < 0.0;
        self.size = bank.size(self.sprite);
    }

    /// Integrate one tick of motion from held direction keys
    pub fn integrate(&mut self, left: bool, right: bool, tuning: &Tuning) {
        self.acc = Vec2::new(0.0, tuning.gravity);
        if left {
            self.acc.x -= tuning.acceleration;
        }
        if right {
            self.acc.x += tuning.acceleration;
        }

        // Friction: exponential horizontal damping
        self.acc.x += self.vel.x * tuning.friction;
        self.vel += self.acc;
        if self.vel.x.abs() < VELOCITY_SNAP {
            self.vel.x = 0.0;
        }
        self.pos += self.vel + 0.5 * self.acc;
        self.pos.x = wrap_x(self.pos.x);
        self.sync_rect();
    }

    /// Start a jump if standing on something. `grounded` is the result of the
    /// nudged ground check. Returns true if the jump started.
    pub fn try_jump(&mut self, grounded: bool, jump_power: f32) -> bool {
        if grounded && !self.jumping {
            self.jumping = true;
            self.vel.y = -jump_power;
            true
        } else {
            false
        }
    }

    /// Jump key released early: cut the ascent short
    pub fn jump_cut(&mut self) -> bool {
        if self.jumping && self.vel.y < JUMP_CUT_THRESHOLD {
            self.vel.y = JUMP_CUT_VELOCITY;
            true
        } else {
            false
        }
    }

    /// Snap onto a platform top
    pub fn land_on(&mut self, top: f32) {
        self.pos.y = top;
        self.vel.y = 0.0;
        self.jumping = false;
    }

    pub fn boost(&mut self, power: f32) {
        self.vel.y = -power;
        self.jumping = false;
    }
}
