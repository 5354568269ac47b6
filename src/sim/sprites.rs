//! Sprite frames and their collision masks
//!
//! The simulation never touches pixels directly: it only needs each frame's
//! size and opaque silhouette. Frames are cropped from a sprite atlas (scaled
//! by `SPRITE_SCALE`) or, when no atlas is available, generated as simple
//! silhouettes of the same dimensions.

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use super::mask::Mask;
use crate::consts::SPRITE_SCALE;

/// Every frame the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteId {
    Stand1,
    Stand2,
    Walk1,
    Walk2,
    Jump,
    PlatformSmall,
    PlatformMedium,
    PlatformLarge,
    Boost,
    EnemyUp,
    EnemyDown,
    Cloud1,
    Cloud2,
    Cloud3,
    Cloud4,
}

impl SpriteId {
    pub const ALL: [SpriteId; 15] = [
        SpriteId::Stand1,
        SpriteId::Stand2,
        SpriteId::Walk1,
        SpriteId::Walk2,
        SpriteId::Jump,
        SpriteId::PlatformSmall,
        SpriteId::PlatformMedium,
        SpriteId::PlatformLarge,
        SpriteId::Boost,
        SpriteId::EnemyUp,
        SpriteId::EnemyDown,
        SpriteId::Cloud1,
        SpriteId::Cloud2,
        SpriteId::Cloud3,
        SpriteId::Cloud4,
    ];

    pub const STANDING: [SpriteId; 2] = [SpriteId::Stand1, SpriteId::Stand2];
    pub const WALKING: [SpriteId; 2] = [SpriteId::Walk1, SpriteId::Walk2];
    pub const JUMPING: [SpriteId; 1] = [SpriteId::Jump];
    pub const PLATFORMS: [SpriteId; 3] = [
        SpriteId::PlatformSmall,
        SpriteId::PlatformMedium,
        SpriteId::PlatformLarge,
    ];
    pub const CLOUDS: [SpriteId; 4] = [
        SpriteId::Cloud1,
        SpriteId::Cloud2,
        SpriteId::Cloud3,
        SpriteId::Cloud4,
    ];

    /// Atlas crop (x, y, w, h) in unscaled atlas pixels; `None` for
    /// decorations that live in their own image files
    pub fn atlas_rect(self) -> Option<(u32, u32, u32, u32)> {
        match self {
            SpriteId::Stand1 => Some((19, 0, 11, 16)),
            SpriteId::Stand2 => Some((66, 0, 11, 16)),
            SpriteId::Walk1 => Some((50, 0, 12, 16)),
            SpriteId::Walk2 => Some((2, 0, 12, 16)),
            SpriteId::Jump => Some((34, 0, 12, 16)),
            SpriteId::PlatformSmall => Some((0, 22, 16, 7)),
            SpriteId::PlatformMedium => Some((22, 22, 20, 7)),
            SpriteId::PlatformLarge => Some((47, 22, 33, 7)),
            SpriteId::Boost => Some((1, 48, 16, 16)),
            SpriteId::EnemyUp => Some((4, 32, 12, 16)),
            SpriteId::EnemyDown => Some((19, 32, 12, 16)),
            SpriteId::Cloud1 | SpriteId::Cloud2 | SpriteId::Cloud3 | SpriteId::Cloud4 => None,
        }
    }

    /// Unscaled size of the built-in silhouette
    fn base_size(self) -> (u32, u32) {
        match self.atlas_rect() {
            Some((_, _, w, h)) => (w, h),
            None => match self {
                SpriteId::Cloud1 => (40, 20),
                SpriteId::Cloud2 => (30, 16),
                SpriteId::Cloud3 => (50, 24),
                _ => (36, 18),
            },
        }
    }

    /// Decorations are scaled per instance, not by `SPRITE_SCALE`
    pub fn is_decoration(self) -> bool {
        self.atlas_rect().is_none()
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One renderable frame: its size and silhouette (plus the mirrored silhouette)
#[derive(Debug, Clone)]
pub struct Frame {
    pub mask: Mask,
    pub mirrored: Mask,
}

impl Frame {
    fn new(mask: Mask) -> Self {
        let mirrored = mask.flipped_horizontal();
        Self { mask, mirrored }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.mask.width() as f32, self.mask.height() as f32)
    }

    pub fn mask_for(&self, flipped: bool) -> &Mask {
        if flipped { &self.mirrored } else { &self.mask }
    }
}

/// All frames, indexed by `SpriteId`
#[derive(Debug, Clone)]
pub struct SpriteBank {
    frames: Vec<Frame>,
}

impl SpriteBank {
    pub fn frame(&self, id: SpriteId) -> &Frame {
        &self.frames[id.index()]
    }

    pub fn size(&self, id: SpriteId) -> Vec2 {
        self.frame(id).size()
    }

    /// Procedural silhouettes with the same dimensions as the atlas crops
    pub fn builtin() -> Self {
        let frames = SpriteId::ALL
            .iter()
            .map(|&id| {
                let (w, h) = id.base_size();
                let mask = silhouette(id, w, h);
                if id.is_decoration() {
                    Frame::new(mask)
                } else {
                    Frame::new(mask.scaled(SPRITE_SCALE))
                }
            })
            .collect();
        Self { frames }
    }

    /// Crop every frame out of `atlas`; decorations come from `decorations`
    /// (falling back to built-in clouds for any that are missing)
    pub fn from_atlas(atlas: &RgbaImage, decorations: &[Option<RgbaImage>]) -> Self {
        let frames = SpriteId::ALL
            .iter()
            .map(|&id| match id.atlas_rect() {
                Some((x, y, w, h)) => Frame::new(crop_mask(atlas, x, y, w, h).scaled(SPRITE_SCALE)),
                None => {
                    let slot = SpriteId::CLOUDS.iter().position(|c| *c == id).unwrap_or(0);
                    match decorations.get(slot).and_then(|d| d.as_ref()) {
                        Some(img) => {
                            let (w, h) = img.dimensions();
                            Frame::new(crop_mask(img, 0, 0, w, h))
                        }
                        None => {
                            let (w, h) = id.base_size();
                            Frame::new(silhouette(id, w, h))
                        }
                    }
                }
            })
            .collect();
        Self { frames }
    }

    /// Load the atlas (and `background1..4.png` beside it). Falls back to the
    /// built-in silhouettes if the atlas cannot be read.
    pub fn load(atlas_path: &Path) -> Self {
        let atlas = match image::open(atlas_path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                log::warn!(
                    "Sprite atlas {} unavailable ({}), using built-in sprites",
                    atlas_path.display(),
                    e
                );
                return Self::builtin();
            }
        };

        let dir = atlas_path.parent().unwrap_or_else(|| Path::new("."));
        let decorations: Vec<Option<RgbaImage>> = (1..=SpriteId::CLOUDS.len())
            .map(|i| {
                image::open(dir.join(format!("background{}.png", i)))
                    .ok()
                    .map(|img| img.to_rgba8())
            })
            .collect();

        log::info!(
            "Loaded sprite atlas {} ({} decorations)",
            atlas_path.display(),
            decorations.iter().filter(|d| d.is_some()).count()
        );
        Self::from_atlas(&atlas, &decorations)
    }
}

/// Pure red is the atlas color key
fn is_opaque(px: [u8; 4]) -> bool {
    px[3] > 0 && !(px[0] == 255 && px[1] == 0 && px[2] == 0)
}

fn crop_mask(img: &RgbaImage, x: u32, y: u32, w: u32, h: u32) -> Mask {
    let (iw, ih) = img.dimensions();
    Mask::from_fn(w, h, |dx, dy| {
        let (sx, sy) = (x + dx, y + dy);
        sx < iw && sy < ih && is_opaque(img.get_pixel(sx, sy).0)
    })
}

/// Rough shapes so collisions behave like the real sprites (transparent
/// corners, gaps between legs)
fn silhouette(id: SpriteId, w: u32, h: u32) -> Mask {
    let ellipse = |x: u32, y: u32| {
        let nx = (x as f32 + 0.5) / w as f32 * 2.0 - 1.0;
        let ny = (y as f32 + 0.5) / h as f32 * 2.0 - 1.0;
        nx * nx + ny * ny <= 1.0
    };

    match id {
        SpriteId::Stand1 | SpriteId::Stand2 | SpriteId::Walk1 | SpriteId::Walk2 | SpriteId::Jump => {
            let stride = matches!(id, SpriteId::Walk1 | SpriteId::Jump);
            Mask::from_fn(w, h, |x, y| {
                let corner = (x == 0 || x == w - 1) && (y < 2 || y == h - 1);
                // Legs: bottom three rows, gap in the middle (wider when striding)
                let legs = y >= h - 3;
                let gap = if stride { 3 } else { 1 };
                let mid = w / 2;
                let between_legs = legs && x + gap > mid && x < mid + gap;
                !corner && !between_legs
            })
        }
        SpriteId::PlatformSmall | SpriteId::PlatformMedium | SpriteId::PlatformLarge => {
            Mask::from_fn(w, h, |x, y| !((x == 0 || x == w - 1) && y == h - 1))
        }
        SpriteId::Boost => Mask::from_fn(w, h, |x, y| {
            let dx = (x as i32 * 2 + 1 - w as i32).abs();
            let dy = (y as i32 * 2 + 1 - h as i32).abs();
            dx + dy <= w as i32
        }),
        SpriteId::EnemyUp | SpriteId::EnemyDown => {
            let wings_up = id == SpriteId::EnemyUp;
            Mask::from_fn(w, h, |x, y| {
                let body = x >= 3 && x < w - 3 && y >= 4 && y < h - 2;
                let wing_rows = if wings_up { 0..5 } else { 8..12 };
                let wing = wing_rows.contains(&y) && (x < 3 || x >= w - 3);
                body || wing
            })
        }
        SpriteId::Cloud1 | SpriteId::Cloud2 | SpriteId::Cloud3 | SpriteId::Cloud4 => {
            Mask::from_fn(w, h, ellipse)
        }
    }
}
