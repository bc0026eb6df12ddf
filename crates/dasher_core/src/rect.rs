//! Screen-space rectangles (top-left origin, y grows downward).

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle whose top-left corner sits at `origin`.
    pub fn at(origin: Vec2, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    /// Shrink by `pad` on every side. A pad larger than half the extent
    /// collapses the rectangle to a point or a negative extent; `overlaps`
    /// still treats that as a point located at the inset corner.
    pub fn inset(self, pad: f32) -> Self {
        Self {
            x: self.x + pad,
            y: self.y + pad,
            width: self.width - 2.0 * pad,
            height: self.height - 2.0 * pad,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict axis-aligned overlap test. Touching edges do not overlap, while
    /// a zero-sized rectangle overlaps anything that strictly contains it.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}
