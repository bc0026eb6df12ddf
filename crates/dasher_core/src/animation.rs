//! Sprite-sheet animation stepped on a fixed per-frame timer.
//!
//! A `SpriteAnim` is a plain value: a source rectangle into a single row of
//! equally sized frames, the world position it is drawn at, and the timer that
//! decides when the next frame is selected. `advance` is a pure transition so
//! the simulation can thread sprite state through each step by value.
//!
//! Timing is intentionally coarse: when the accumulated time reaches the frame
//! duration the timer resets to zero and at most one frame is advanced, no
//! matter how large the step was. Overflow is discarded rather than carried.

use glam::Vec2;

use crate::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteAnim {
    /// Region of the sprite sheet currently drawn.
    pub source: Rect,
    /// Top-left corner in screen space.
    pub position: Vec2,
    /// Index of the frame that the next timer expiry will select.
    pub frame: u32,
    /// Seconds each frame stays on screen.
    pub update_time: f32,
    /// Seconds accumulated since the last frame change.
    pub running_time: f32,
}

impl SpriteAnim {
    pub fn new(frame_width: f32, frame_height: f32, position: Vec2, update_time: f32) -> Self {
        Self {
            source: Rect::new(0.0, 0.0, frame_width, frame_height),
            position,
            frame: 0,
            update_time,
            running_time: 0.0,
        }
    }

    /// On-screen bounds of the sprite at its current position.
    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, self.source.width, self.source.height)
    }
}

/// Accumulate `dt` and, once the frame duration is reached, select the next
/// frame of the row. `frame` wraps to 0 after `max_frame`.
pub fn advance(mut anim: SpriteAnim, dt: f32, max_frame: u32) -> SpriteAnim {
    anim.running_time += dt;
    if anim.running_time >= anim.update_time {
        anim.running_time = 0.0;

        anim.source.x = anim.frame as f32 * anim.source.width;
        anim.frame += 1;
        if anim.frame > max_frame {
            anim.frame = 0;
        }
    }
    anim
}
