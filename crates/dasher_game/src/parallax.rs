/// One horizontally tiling background layer.
///
/// The layer is drawn twice side by side, at `offset` and `offset + wrap_width`,
/// and scrolls left at `speed`. Once the first copy is fully off screen the
/// offset snaps back to zero, which looks identical because the second copy
/// is now exactly where the first one started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub offset: f32,
    /// Scroll speed in units/s, always moving left.
    pub speed: f32,
    /// On-screen width of one copy (texture width times draw scale).
    pub wrap_width: f32,
}

impl ParallaxLayer {
    pub fn new(speed: f32, texture_width: u32, scale: f32) -> Self {
        Self {
            offset: 0.0,
            speed,
            wrap_width: texture_width as f32 * scale,
        }
    }

    pub fn advance(mut self, dt: f32) -> Self {
        self.offset -= self.speed * dt;
        if self.offset <= -self.wrap_width {
            self.offset = 0.0;
        }
        self
    }

    /// Left edge of both copies in draw order.
    pub fn tile_positions(&self) -> [f32; 2] {
        [self.offset, self.offset + self.wrap_width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolls_left_at_its_speed() {
        let layer = ParallaxLayer::new(40.0, 256, 2.0).advance(0.5);
        assert_eq!(layer.offset, -20.0);
        assert_eq!(layer.tile_positions(), [-20.0, 492.0]);
    }

    #[test]
    fn wraps_to_zero_at_two_texture_widths() {
        let mut layer = ParallaxLayer::new(80.0, 256, 2.0);
        layer.offset = -500.0;

        let still_scrolling = layer.advance(0.1);
        assert_eq!(still_scrolling.offset, -508.0);

        let wrapped = still_scrolling.advance(0.05);
        assert_eq!(wrapped.offset, 0.0, "offset -512 reaches the wrap threshold");
    }

    #[test]
    fn offset_stays_within_one_tile() {
        let mut layer = ParallaxLayer::new(80.0, 256, 2.0);
        for _ in 0..10_000 {
            layer = layer.advance(1.0 / 60.0);
            assert!(layer.offset <= 0.0 && layer.offset > -512.0);
        }
    }

    #[test]
    fn layers_differ_only_by_speed() {
        let far = ParallaxLayer::new(20.0, 256, 2.0).advance(1.0);
        let near = ParallaxLayer::new(80.0, 256, 2.0).advance(1.0);
        assert_eq!(far.offset, -20.0);
        assert_eq!(near.offset, -80.0);
    }
}
