//! Per-frame simulation tick
//!
//! Core game loop that advances a session by one frame. Order per tick:
//! jump input, entity updates (player physics + animation, enemy motion,
//! power-up tracking, scenery cleanup), enemy spawning, enemy collision,
//! landing, scroll compensation, power-up pickup, fall-through cleanup,
//! the out-of-platforms check, and finally platform replenishment.

use std::collections::BTreeMap;

use super::collision;
use super::entity::{Entity, Fate};
use super::registry::EntityId;
use super::rect::Rect;
use super::spawn;
use super::state::{EndReason, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Jump key went down this frame
    pub jump_pressed: bool,
    /// Jump key came up this frame
    pub jump_released: bool,
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u64) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;
    state.time_ms += dt_ms;

    handle_jump_input(state, input);
    update_entities(state, input);

    if let Some(id) = spawn::maybe_spawn_enemy(state) {
        state.events.push(GameEvent::EnemySpawned(id));
    }

    if let Some(id) = collision::enemy_hit(&state.player, &state.registry, &state.bank) {
        log::info!("Player hit enemy {:?} at score {}", id, state.score);
        state.events.push(GameEvent::EnemyHit(id));
        state.end(EndReason::EnemyHit);
    }

    let was_jumping = state.player.jumping;
    if let Some(id) = collision::resolve_landing(&mut state.player, &state.registry)
        && was_jumping
    {
        state.events.push(GameEvent::Landed(id));
    }

    scroll_world(state);

    let collected = collision::resolve_powups(
        &mut state.player,
        &mut state.registry,
        state.tuning.boost_power,
    );
    state
        .events
        .extend(collected.into_iter().map(|_| GameEvent::Boosted));

    fall_through(state);

    if state.platform_count() == 0 {
        log::info!("Out of platforms at score {}", state.score);
        state.end(EndReason::OutOfPlatforms);
    }

    spawn::replenish_platforms(state);
}

fn handle_jump_input(state: &mut GameState, input: &TickInput) {
    if input.jump_pressed {
        let grounded = collision::can_jump(&state.player, &state.registry);
        if state.player.try_jump(grounded, state.tuning.jump_power) {
            state.events.push(GameEvent::Jumped);
        }
    }
    if input.jump_released {
        state.player.jump_cut();
    }
}

/// Player animation + physics, then every other entity's own update.
/// Removals are collected first and applied after the pass.
fn update_entities(state: &mut GameState, input: &TickInput) {
    state.player.animate(state.time_ms, &state.bank);
    state
        .player
        .integrate(input.left, input.right, &state.tuning);

    let platform_rects: BTreeMap<EntityId, Rect> = state
        .registry
        .platforms()
        .map(|(id, p)| (id, p.rect))
        .collect();

    let bank = &state.bank;
    let doomed: Vec<EntityId> = state
        .registry
        .iter_mut()
        .filter_map(|(id, entity)| {
            match entity.advance(|owner| platform_rects.get(&owner).copied(), bank) {
                Fate::Keep => None,
                Fate::Despawn => Some(id),
            }
        })
        .collect();
    state.registry.despawn_all(doomed);
}

/// Hold the camera once the player reaches the top quarter by pushing the
/// world down instead. Platforms pushed off the bottom score a point each.
fn scroll_world(state: &mut GameState) {
    if state.player.rect().top() > HEIGHT / 4.0 {
        return;
    }

    spawn::maybe_spawn_background(state);

    let speed = state.player.vel.y.abs();
    let step = speed.max(MIN_SCROLL);
    let parallax_step = (speed / 2.0).max(MIN_SCROLL);

    state.player.pos.y += step;

    let mut passed = Vec::new();
    for (id, entity) in state.registry.iter_mut() {
        match entity {
            Entity::Background(b) => b.rect.y += parallax_step,
            Entity::Enemy(e) => e.rect.y += step,
            Entity::Platform(p) => {
                p.rect.y += step;
                if p.rect.top() >= HEIGHT {
                    passed.push(id);
                }
            }
            // Power-ups re-anchor to their platform next tick
            Entity::PowUp(_) => {}
        }
    }

    let scored = state.registry.despawn_all(passed) as u64;
    state.score += scored;
    for _ in 0..scored {
        state.events.push(GameEvent::PlatformPassed);
    }
}

/// Player below the screen: everything keeps scrolling up past the top edge
/// and is removed once fully above it.
fn fall_through(state: &mut GameState) {
    if state.player.rect().bottom() <= HEIGHT {
        return;
    }

    let push = state.player.vel.y.max(MIN_FALL_SCROLL);
    let gone: Vec<EntityId> = state
        .registry
        .iter_mut()
        .filter_map(|(id, entity)| {
            let rect = entity.rect_mut();
            rect.y -= push;
            (rect.bottom() < 0.0).then_some(id)
        })
        .collect();
    state.registry.despawn_all(gone);
}
