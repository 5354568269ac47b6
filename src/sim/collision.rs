//! Collision queries between the player and the world
//!
//! Queries never mutate; the `resolve_*` functions apply the outcome of a
//! query to the player so the same check can run twice without stacking.

use super::entity::PowUpKind;
use super::mask::Mask;
use super::player::Player;
use super::rect::Rect;
use super::registry::{EntityId, Registry};
use super::sprites::SpriteBank;
use crate::consts::{JUMP_NUDGE, LANDING_TOLERANCE};

/// Pixel-accurate overlap of two placed masks
pub fn masks_collide(a: &Mask, a_rect: &Rect, b: &Mask, b_rect: &Rect) -> bool {
    if !a_rect.overlaps(b_rect) {
        return false;
    }
    let offset = (
        (b_rect.x - a_rect.x).round() as i32,
        (b_rect.y - a_rect.y).round() as i32,
    );
    a.overlaps(b, offset)
}

/// First enemy whose silhouette touches the player's
pub fn enemy_hit(player: &Player, registry: &Registry, bank: &SpriteBank) -> Option<EntityId> {
    let player_rect = player.rect();
    let player_mask = bank.frame(player.sprite).mask_for(player.flipped);
    registry
        .enemies()
        .find(|(_, e)| {
            masks_collide(
                player_mask,
                &player_rect,
                &bank.frame(e.sprite).mask,
                &e.rect,
            )
        })
        .map(|(id, _)| id)
}

/// Any platform overlapping `rect`
pub fn touches_platform(rect: &Rect, registry: &Registry) -> bool {
    registry.platforms().any(|(_, p)| p.rect.overlaps(rect))
}

/// Ground check for jumping: nudge the player's rect sideways and test it,
/// without moving the player
pub fn can_jump(player: &Player, registry: &Registry) -> bool {
    touches_platform(&player.rect().translated(JUMP_NUDGE, 0.0), registry)
}

/// Where a falling player would land this tick.
///
/// Among all overlapping platforms, the lowest on screen (greatest bottom)
/// is the candidate. It is accepted only if the player's center is within
/// its span (plus tolerance) and the player's feet are above its bottom.
pub fn landing_platform(player: &Player, registry: &Registry) -> Option<(EntityId, Rect)> {
    if player.vel.y <= 0.0 {
        return None;
    }

    let player_rect = player.rect();
    let (id, lowest) = registry
        .platforms()
        .filter(|(_, p)| p.rect.overlaps(&player_rect))
        .fold(None::<(EntityId, Rect)>, |best, (id, p)| match best {
            Some((_, r)) if p.rect.bottom() <= r.bottom() => best,
            _ => Some((id, p.rect)),
        })?;

    let within_span = player.pos.x < lowest.right() + LANDING_TOLERANCE
        && player.pos.x > lowest.left() - LANDING_TOLERANCE;
    let above_bottom = player.pos.y < lowest.bottom();
    (within_span && above_bottom).then_some((id, lowest))
}

/// Land the player if a landing is available. Returns the platform landed on.
pub fn resolve_landing(player: &mut Player, registry: &Registry) -> Option<EntityId> {
    let (id, rect) = landing_platform(player, registry)?;
    player.land_on(rect.top());
    Some(id)
}

/// Power-ups the player is touching
pub fn touched_powups(player: &Player, registry: &Registry) -> Vec<(EntityId, PowUpKind)> {
    let player_rect = player.rect();
    registry
        .powups()
        .filter(|(_, p)| p.rect.overlaps(&player_rect))
        .map(|(id, p)| (id, p.kind))
        .collect()
}

/// Consume every touched power-up and apply its effect. Returns the kinds
/// collected.
pub fn resolve_powups(
    player: &mut Player,
    registry: &mut Registry,
    boost_power: f32,
) -> Vec<PowUpKind> {
    let touched = touched_powups(player, registry);
    registry.despawn_all(touched.iter().map(|(id, _)| *id));
    for (_, kind) in &touched {
        match kind {
            PowUpKind::Boost => player.boost(boost_power),
        }
    }
    touched.into_iter().map(|(_, kind)| kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Enemy, Entity, Platform, PowUp};
    use crate::sim::sprites::SpriteId;
    use glam::Vec2;

    fn setup() -> (SpriteBank, Player, Registry) {
        let bank = SpriteBank::builtin();
        let mut player = Player::new(&bank);
        // Rect: x 72.5..127.5, y 220..300
        player.pos = Vec2::new(100.0, 300.0);
        player.vel = Vec2::new(0.0, 3.0);
        player.sync_rect();
        (bank, player, Registry::new())
    }

    fn platform(reg: &mut Registry, x: f32, y: f32) -> EntityId {
        reg.spawn(Entity::Platform(Platform {
            rect: Rect::new(x, y, 80.0, 35.0),
            sprite: SpriteId::PlatformSmall,
        }))
    }

    fn enemy_at(reg: &mut Registry, bank: &SpriteBank, x: f32, y: f32) -> EntityId {
        let size = bank.size(SpriteId::EnemyUp);
        reg.spawn(Entity::Enemy(Enemy {
            rect: Rect::new(x, y, size.x, size.y),
            vx: 0.0,
            vy: 0.0,
            dy: 0.5,
            sprite: SpriteId::EnemyUp,
        }))
    }

    #[test]
    fn test_lands_on_lowest_overlapping_platform() {
        let (_, mut player, mut reg) = setup();
        let _upper = platform(&mut reg, 60.0, 250.0); // bottom 285
        let lower = platform(&mut reg, 60.0, 280.0); // bottom 315

        assert_eq!(resolve_landing(&mut player, &reg), Some(lower));
        assert_eq!(player.pos.y, 280.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.jumping);
    }

    #[test]
    fn test_lowest_wins_regardless_of_spawn_order() {
        let (_, mut player, mut reg) = setup();
        let lower = platform(&mut reg, 60.0, 280.0);
        let _upper = platform(&mut reg, 60.0, 250.0);
        assert_eq!(resolve_landing(&mut player, &reg), Some(lower));
    }

    #[test]
    fn test_rejects_center_outside_tolerance() {
        let (_, mut player, mut reg) = setup();
        // Overlaps the rect, but left - 14 = 106 > center 100
        platform(&mut reg, 120.0, 280.0);
        assert_eq!(resolve_landing(&mut player, &reg), None);
        assert_eq!(player.pos.y, 300.0);
        assert_eq!(player.vel.y, 3.0);

        // Within tolerance: left - 14 = 99 < 100
        let (_, mut player, mut reg) = setup();
        platform(&mut reg, 113.0, 280.0);
        assert!(resolve_landing(&mut player, &reg).is_some());
    }

    #[test]
    fn test_rejects_feet_below_platform() {
        let (_, mut player, mut reg) = setup();
        platform(&mut reg, 60.0, 240.0); // bottom 275 < feet 300
        assert_eq!(resolve_landing(&mut player, &reg), None);
    }

    #[test]
    fn test_no_landing_while_rising() {
        let (_, mut player, mut reg) = setup();
        platform(&mut reg, 60.0, 280.0);
        player.vel.y = -4.0;
        assert_eq!(resolve_landing(&mut player, &reg), None);
        player.vel.y = 0.0;
        assert_eq!(resolve_landing(&mut player, &reg), None);
    }

    #[test]
    fn test_landing_is_idempotent() {
        let (_, mut player, mut reg) = setup();
        platform(&mut reg, 60.0, 280.0);
        player.jumping = true;
        assert!(resolve_landing(&mut player, &reg).is_some());
        let pos = player.pos;
        let vel = player.vel;

        assert_eq!(resolve_landing(&mut player, &reg), None);
        assert_eq!(player.pos, pos);
        assert_eq!(player.vel, vel);
        assert!(!player.jumping);
    }

    #[test]
    fn test_jump_ground_nudge() {
        let (_, player, mut reg) = setup();
        assert!(!can_jump(&player, &reg));
        // Just right of the player's rect; only the nudged rect touches it
        platform(&mut reg, 128.5, 290.0);
        assert!(!touches_platform(&player.rect(), &reg));
        assert!(can_jump(&player, &reg));
    }

    #[test]
    fn test_enemy_hit_is_pixel_accurate() {
        let (bank, player, mut reg) = setup();
        let r = player.rect();
        // Boxes overlap by 3px at the player's top-left corner, where both
        // silhouettes are transparent
        enemy_at(&mut reg, &bank, r.x - 57.0, r.y - 77.0);
        assert_eq!(enemy_hit(&player, &reg, &bank), None);

        let centered = enemy_at(&mut reg, &bank, r.x, r.y);
        assert_eq!(enemy_hit(&player, &reg, &bank), Some(centered));
    }

    #[test]
    fn test_boost_consumes_and_launches() {
        let (bank, mut player, mut reg) = setup();
        let owner = platform(&mut reg, 60.0, 400.0);
        let mut powup = PowUp::new(
            PowUpKind::Boost,
            owner,
            &Rect::new(60.0, 400.0, 80.0, 35.0),
            &bank,
        );
        powup.rect = Rect::new(90.0, 250.0, 80.0, 80.0);
        let id = reg.spawn(Entity::PowUp(powup));

        player.jumping = true;
        player.vel.y = 7.0;
        let collected = resolve_powups(&mut player, &mut reg, 60.0);
        assert_eq!(collected, vec![PowUpKind::Boost]);
        assert_eq!(player.vel.y, -60.0);
        assert!(!player.jumping);
        assert!(!reg.contains(id));
        assert!(reg.contains(owner));
    }
}
