//! Player vs. obstacle hit test.
//!
//! The player's full sprite frame is its hurtbox. Each obstacle's frame is
//! shrunk by a fixed inset on every side before testing, so only the visible
//! core of the nebula counts. With the shipped 100x100 frames and a 50 inset
//! the hitbox collapses to a point at the centre of the frame, which still
//! registers a hit while strictly inside the player's rectangle.

use dasher_core::{Rect, SpriteAnim};

pub fn obstacle_hitbox(obstacle: &SpriteAnim, inset: f32) -> Rect {
    obstacle.bounds().inset(inset)
}

/// Index of the first obstacle whose hitbox overlaps `player`, if any.
pub fn first_hit(player: &Rect, obstacles: &[SpriteAnim], inset: f32) -> Option<usize> {
    obstacles
        .iter()
        .position(|obstacle| obstacle_hitbox(obstacle, inset).overlaps(player))
}
