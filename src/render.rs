//! Scene building for frontends
//!
//! Turns a session (or one of the menu screens) into a flat, back-to-front
//! list of sprites plus text overlays. Frontends only rasterize what they
//! are handed here; nothing in this module touches a terminal.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{EntityKind, GameState, Rect, SpriteId};

pub const TITLE: &str = "SKYHOP";
pub const CREDITS: &str = "Nathan Dar | Sam Lam";

/// RGB color
pub type Rgb = (u8, u8, u8);

pub const TEXT_COLOR: Rgb = (255, 255, 255);

/// Full-screen fill behind everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Sky,
    Start,
    End,
}

impl Backdrop {
    pub fn color(self) -> Rgb {
        match self {
            Backdrop::Sky => (112, 196, 240),
            Backdrop::Start => (38, 110, 190),
            Backdrop::End => (176, 52, 60),
        }
    }
}

/// One sprite to blit, already positioned in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: EntityKind,
    pub sprite: SpriteId,
    pub flipped: bool,
    pub rect: Rect,
}

/// A line of text anchored at its midtop
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    /// Nominal font size in viewport pixels
    pub size: f32,
    pub anchor: Vec2,
}

impl TextOverlay {
    fn centered(text: impl Into<String>, size: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            size,
            anchor: Vec2::new(WIDTH / 2.0, y),
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub backdrop: Backdrop,
    /// Back to front
    pub sprites: Vec<DrawItem>,
    pub texts: Vec<TextOverlay>,
}

/// The running game: every entity ordered by (layer, id), player included,
/// with the distance HUD on top
pub fn playing_scene(state: &GameState) -> Scene {
    let mut sprites: Vec<(u8, DrawItem)> = state
        .registry
        .iter()
        .map(|(_, entity)| {
            let kind = entity.kind();
            let item = DrawItem {
                kind,
                sprite: entity.sprite(),
                flipped: false,
                rect: *entity.rect(),
            };
            (kind.layer(), item)
        })
        .collect();

    sprites.push((
        PLAYER_LAYER,
        DrawItem {
            kind: EntityKind::Player,
            sprite: state.player.sprite,
            flipped: state.player.flipped,
            rect: state.player.rect(),
        },
    ));

    // Stable: ties keep registry (id) order
    sprites.sort_by_key(|(layer, _)| *layer);

    Scene {
        backdrop: Backdrop::Sky,
        sprites: sprites.into_iter().map(|(_, item)| item).collect(),
        texts: vec![TextOverlay::centered(format!("{}m", state.score), 60.0, 20.0)],
    }
}

pub fn start_scene() -> Scene {
    Scene {
        backdrop: Backdrop::Start,
        sprites: Vec::new(),
        texts: vec![
            TextOverlay::centered(TITLE, 150.0, 150.0),
            TextOverlay::centered(CREDITS, 20.0, 325.0),
            TextOverlay::centered("| press a key to start |", 35.0, HEIGHT * 3.0 / 4.0),
        ],
    }
}

/// Final score plus either the new-best banner or the standing best
pub fn game_over_scene(score: u64, best: u64, new_best: bool) -> Scene {
    let best_line = if new_best {
        TextOverlay::centered("NEW HIGH SCORE", 35.0, 330.0)
    } else {
        TextOverlay::centered(format!("High Score - [ {}m ]", best), 35.0, 330.0)
    };

    Scene {
        backdrop: Backdrop::End,
        sprites: Vec::new(),
        texts: vec![
            TextOverlay::centered("GAME OVER", 75.0, 150.0),
            TextOverlay::centered(format!("Score - [ {}m ]", score), 40.0, HEIGHT / 2.0),
            best_line,
            TextOverlay::centered("| press a key to play again |", 35.0, HEIGHT * 3.0 / 4.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::settings::Tuning;
    use crate::sim::{Enemy, Entity, SpriteBank, spawn};

    fn state() -> GameState {
        let tuning = Tuning {
            powerup_spawn_pct: 100,
            ..Tuning::default()
        };
        GameState::new(3, tuning, Rc::new(SpriteBank::builtin()))
    }

    #[test]
    fn test_playing_scene_layers_back_to_front() {
        let mut state = state();
        spawn::spawn_background(&mut state);
        state.registry.spawn(Entity::Enemy(Enemy {
            rect: Rect::new(10.0, 10.0, 60.0, 80.0),
            vx: 1.0,
            vy: 0.0,
            dy: ENEMY_DY,
            sprite: SpriteId::EnemyUp,
        }));

        let scene = playing_scene(&state);
        assert_eq!(scene.backdrop, Backdrop::Sky);
        assert_eq!(scene.sprites.len(), state.registry.len() + 1);

        let layers: Vec<u8> = scene.sprites.iter().map(|s| s.kind.layer()).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scene.sprites[0].kind, EntityKind::Background);
        assert_eq!(scene.sprites.last().map(|s| s.kind), Some(EntityKind::Enemy));
        assert_eq!(
            scene
                .sprites
                .iter()
                .filter(|s| s.kind == EntityKind::Player)
                .count(),
            1
        );
    }

    #[test]
    fn test_same_layer_keeps_id_order() {
        let state = state();
        let scene = playing_scene(&state);
        let platform_rects: Vec<Rect> = scene
            .sprites
            .iter()
            .filter(|s| s.kind == EntityKind::Platform)
            .map(|s| s.rect)
            .collect();
        let expected: Vec<Rect> = state.registry.platforms().map(|(_, p)| p.rect).collect();
        assert_eq!(platform_rects, expected);
    }

    #[test]
    fn test_hud_shows_score() {
        let mut state = state();
        state.score = 17;
        let scene = playing_scene(&state);
        assert_eq!(scene.texts.len(), 1);
        assert_eq!(scene.texts[0].text, "17m");
        assert_eq!(scene.texts[0].anchor, Vec2::new(WIDTH / 2.0, 20.0));
    }

    #[test]
    fn test_menu_screens() {
        let start = start_scene();
        assert_eq!(start.backdrop, Backdrop::Start);
        assert!(start.texts.iter().any(|t| t.text == "| press a key to start |"));

        let over = game_over_scene(12, 30, false);
        assert_eq!(over.backdrop, Backdrop::End);
        let lines: Vec<&str> = over.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            lines,
            [
                "GAME OVER",
                "Score - [ 12m ]",
                "High Score - [ 30m ]",
                "| press a key to play again |",
            ]
        );

        let best = game_over_scene(31, 31, true);
        assert!(best.texts.iter().any(|t| t.text == "NEW HIGH SCORE"));
        assert!(!best.texts.iter().any(|t| t.text.starts_with("High Score")));
    }
}
