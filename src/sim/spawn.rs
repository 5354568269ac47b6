//! Procedural generation: platforms, power-ups, enemies and scenery

use glam::Vec2;
use rand::Rng;

use super::entity::{Background, Enemy, Entity, Platform, PowUp, PowUpKind};
use super::rect::Rect;
use super::registry::EntityId;
use super::sprites::SpriteId;
use super::state::GameState;
use crate::consts::*;

/// Spawn a platform with its top-left at (x, y). The sprite variant is
/// random, and the platform may come with a power-up.
pub fn spawn_platform(state: &mut GameState, x: f32, y: f32) -> EntityId {
    let variants = SpriteId::PLATFORMS;
    let sprite = variants[state.rng.random_range(0..variants.len())];
    let size = state.bank.size(sprite);
    let id = state.registry.spawn(Entity::Platform(Platform {
        rect: Rect::new(x, y, size.x, size.y),
        sprite,
    }));

    if state.rng.random_range(0..100) < state.tuning.powerup_spawn_pct {
        spawn_powup(state, id);
    }
    id
}

/// Attach a random power-up to a live platform
pub fn spawn_powup(state: &mut GameState, platform: EntityId) -> Option<EntityId> {
    let platform_rect = *state.registry.get(platform)?.rect();
    let kinds = PowUpKind::ALL;
    let kind = kinds[state.rng.random_range(0..kinds.len())];
    let powup = PowUp::new(kind, platform, &platform_rect, &state.bank);
    Some(state.registry.spawn(Entity::PowUp(powup)))
}

/// Spawn an enemy if the (jittered) spawn interval has elapsed
pub fn maybe_spawn_enemy(state: &mut GameState) -> Option<EntityId> {
    let jitter = ENEMY_JITTER_MS[state.rng.random_range(0..ENEMY_JITTER_MS.len())];
    let interval = i64::try_from(state.tuning.enemy_interval_ms)
        .unwrap_or(i64::MAX)
        .saturating_add(jitter);
    let elapsed = state.time_ms.saturating_sub(state.enemy_timer_ms) as i64;
    if elapsed <= interval {
        return None;
    }
    state.enemy_timer_ms = state.time_ms;
    Some(spawn_enemy(state))
}

/// Enemy entering from a random side, heading across
pub fn spawn_enemy(state: &mut GameState) -> EntityId {
    let from_right = state.rng.random_bool(0.5);
    let centerx = if from_right {
        WIDTH + ENEMY_MARGIN
    } else {
        -ENEMY_MARGIN
    };
    let speed = state.rng.random_range(1..4) as f32;
    let vx = if from_right { -speed } else { speed };
    let top = state.rng.random_range(0..(HEIGHT / 2.0) as i32) as f32;

    let sprite = SpriteId::EnemyUp;
    let size = state.bank.size(sprite);
    let mut rect = Rect::from_center(Vec2::new(centerx, 0.0), size);
    rect.y = top;

    let id = state.registry.spawn(Entity::Enemy(Enemy {
        rect,
        vx,
        vy: 0.0,
        dy: ENEMY_DY,
        sprite,
    }));
    log::debug!("Enemy {:?} spawned at x={} vx={}", id, centerx, vx);
    id
}

/// Roll the per-tick chance for a new background decoration
pub fn maybe_spawn_background(state: &mut GameState) -> Option<EntityId> {
    if state.rng.random_range(0..100) < state.tuning.background_spawn_pct {
        Some(spawn_background(state))
    } else {
        None
    }
}

/// Decoration placed above the screen, scaled by a random factor in [4.0, 5.0)
pub fn spawn_background(state: &mut GameState) -> EntityId {
    let clouds = SpriteId::CLOUDS;
    let sprite = clouds[state.rng.random_range(0..clouds.len())];
    let scale = state.rng.random_range(400..500) as f32 / 100.0;
    let size = (state.bank.size(sprite) * scale).floor();

    let max_x = ((WIDTH - size.x) as i32).max(1);
    let x = state.rng.random_range(0..max_x) as f32;
    let y = state.rng.random_range(-800..-50) as f32;

    state.registry.spawn(Entity::Background(Background {
        rect: Rect::new(x, y, size.x, size.y),
        sprite,
        scale,
    }))
}

/// Top the platform count back up to the configured floor with new
/// platforms just above the screen. Returns how many were added.
pub fn replenish_platforms(state: &mut GameState) -> usize {
    let mut added = 0;
    while state.platform_count() < state.tuning.min_platforms {
        let width = state.rng.random_range(50..100);
        let x = state.rng.random_range(0..(WIDTH as i32 - width)) as f32;
        let y = state.rng.random_range(-75..-30) as f32;
        spawn_platform(state, x, y);
        added += 1;
    }
    added
}
