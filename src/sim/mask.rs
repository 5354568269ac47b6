//! Pixel-accurate collision masks
//!
//! A mask is the opaque silhouette of one sprite frame. Two sprites collide
//! when any opaque pixel of one lands on an opaque pixel of the other.

/// Row-major bitmap of opaque pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Fully opaque mask
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask by asking `opaque(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opaque test; out-of-range coordinates are empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Mirror left-to-right (for sprites facing the other way)
    pub fn flipped_horizontal(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get((self.width - 1 - x) as i32, y as i32)
        })
    }

    /// Nearest-neighbour upscale by an integer factor
    pub fn scaled(&self, factor: u32) -> Self {
        Self::from_fn(self.width * factor, self.height * factor, |x, y| {
            self.get((x / factor) as i32, (y / factor) as i32)
        })
    }

    /// Does any opaque pixel of `other`, placed at `offset` relative to this
    /// mask's top-left corner, cover an opaque pixel of this mask?
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        // Intersection of the two boxes, in this mask's coordinates
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }
}
