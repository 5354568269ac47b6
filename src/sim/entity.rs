//! World entities besides the player
//!
//! Entities form a closed set of variants. Each has a bounding rect, a
//! current frame, and an `advance` rule run once per tick.

use super::rect::Rect;
use super::registry::EntityId;
use super::sprites::{SpriteBank, SpriteId};
use crate::consts::*;

/// Every kind of thing on screen, in ascending draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Background,
    Platform,
    PowUp,
    Player,
    Enemy,
}

impl EntityKind {
    pub fn layer(self) -> u8 {
        match self {
            EntityKind::Background => BACKGROUND_LAYER,
            EntityKind::Platform => PLATFORM_LAYER,
            EntityKind::PowUp => POWUP_LAYER,
            EntityKind::Player => PLAYER_LAYER,
            EntityKind::Enemy => ENEMY_LAYER,
        }
    }
}

/// A static ledge. Only moves when the world scrolls.
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    pub sprite: SpriteId,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowUpKind {
    Boost,
}

impl PowUpKind {
    pub const ALL: [PowUpKind; 1] = [PowUpKind::Boost];

    pub fn sprite(self) -> SpriteId {
        match self {
            PowUpKind::Boost => SpriteId::Boost,
        }
    }
}

/// A pickup hovering above its platform. `platform` is a handle, not an
/// owner: the pickup disappears once that platform is gone.
#[derive(Debug, Clone)]
pub struct PowUp {
    pub rect: Rect,
    pub kind: PowUpKind,
    pub platform: EntityId,
}

impl PowUp {
    /// Place above the owning platform's top edge
    pub fn new(kind: PowUpKind, platform: EntityId, platform_rect: &Rect, bank: &SpriteBank) -> Self {
        let size = bank.size(kind.sprite());
        let mut rect = Rect::new(0.0, 0.0, size.x, size.y);
        rect.set_centerx(platform_rect.centerx());
        rect.set_bottom(platform_rect.top() - POWUP_GAP);
        Self {
            rect,
            kind,
            platform,
        }
    }
}

/// A flyer crossing the screen horizontally while bobbing up and down
#[derive(Debug, Clone)]
pub struct Enemy {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub dy: f32,
    pub sprite: SpriteId,
}

impl Enemy {
    /// Horizontal step, then the bounce oscillator: `vy` moves by `dy` and
    /// `dy` flips sign on reaching the bound. The frame follows `dy`.
    fn step(&mut self, bank: &SpriteBank) {
        self.rect.x += self.vx;
        self.vy += self.dy;
        if self.vy >= ENEMY_VY_LIMIT || self.vy <= -ENEMY_VY_LIMIT {
            self.vy = self.vy.clamp(-ENEMY_VY_LIMIT, ENEMY_VY_LIMIT);
            self.dy = -self.dy;
        }

        self.sprite = if self.dy < 0.0 {
            SpriteId::EnemyUp
        } else {
            SpriteId::EnemyDown
        };
        let center = self.rect.center();
        self.rect = Rect::from_center(center, bank.size(self.sprite));
        self.rect.y += self.vy;
    }

    fn off_screen(&self) -> bool {
        self.rect.left() > WIDTH + ENEMY_MARGIN || self.rect.right() < -ENEMY_MARGIN
    }
}

/// Decorative scenery, scaled per instance
#[derive(Debug, Clone)]
pub struct Background {
    pub rect: Rect,
    pub sprite: SpriteId,
    pub scale: f32,
}

/// What the registry should do with an entity after it advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Despawn,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Platform(Platform),
    PowUp(PowUp),
    Enemy(Enemy),
    Background(Background),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Platform(_) => EntityKind::Platform,
            Entity::PowUp(_) => EntityKind::PowUp,
            Entity::Enemy(_) => EntityKind::Enemy,
            Entity::Background(_) => EntityKind::Background,
        }
    }

    pub fn rect(&self) -> &Rect {
        match self {
            Entity::Platform(p) => &p.rect,
            Entity::PowUp(p) => &p.rect,
            Entity::Enemy(e) => &e.rect,
            Entity::Background(b) => &b.rect,
        }
    }

    pub fn rect_mut(&mut self) -> &mut Rect {
        match self {
            Entity::Platform(p) => &mut p.rect,
            Entity::PowUp(p) => &mut p.rect,
            Entity::Enemy(e) => &mut e.rect,
            Entity::Background(b) => &mut b.rect,
        }
    }

    pub fn sprite(&self) -> SpriteId {
        match self {
            Entity::Platform(p) => p.sprite,
            Entity::PowUp(p) => p.kind.sprite(),
            Entity::Enemy(e) => e.sprite,
            Entity::Background(b) => b.sprite,
        }
    }

    /// Advance one tick. `platform_rect` looks up a live platform by id.
    pub fn advance(
        &mut self,
        platform_rect: impl Fn(EntityId) -> Option<Rect>,
        bank: &SpriteBank,
    ) -> Fate {
        match self {
            Entity::Platform(_) => Fate::Keep,
            Entity::PowUp(p) => match platform_rect(p.platform) {
                Some(owner) => {
                    p.rect.set_bottom(owner.top() - POWUP_GAP);
                    Fate::Keep
                }
                None => Fate::Despawn,
            },
            Entity::Enemy(e) => {
                e.step(bank);
                if e.off_screen() {
                    Fate::Despawn
                } else {
                    Fate::Keep
                }
            }
            Entity::Background(b) => {
                if b.rect.top() > HEIGHT {
                    Fate::Despawn
                } else {
                    Fate::Keep
                }
            }
        }
    }
}
