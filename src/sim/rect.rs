//! Axis-aligned rectangles with sprite-style anchors

use glam::Vec2;

/// An axis-aligned rectangle in viewport space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size whose bottom-center sits on `anchor`
    pub fn from_midbottom(anchor: Vec2, size: Vec2) -> Self {
        Self::new(anchor.x - size.x / 2.0, anchor.y - size.y, size.x, size.y)
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn centerx(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.centerx(), self.y + self.h / 2.0)
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_centerx(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    /// Copy of this rect moved by (dx, dy)
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Strict interior overlap; rects that merely share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midbottom_anchor() {
        let r = Rect::from_midbottom(Vec2::new(50.0, 500.0), Vec2::new(60.0, 80.0));
        assert_eq!(r.left(), 20.0);
        assert_eq!(r.bottom(), 500.0);
        assert_eq!(r.top(), 420.0);
        assert_eq!(r.centerx(), 50.0);
    }

    #[test]
    fn test_overlap_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(30.0, 30.0, 1.0, 1.0)));
    }

    #[test]
    fn test_set_bottom_keeps_height() {
        let mut r = Rect::new(0.0, 0.0, 80.0, 35.0);
        r.set_bottom(100.0);
        assert_eq!(r.top(), 65.0);
        assert_eq!(r.h, 35.0);
    }
}
