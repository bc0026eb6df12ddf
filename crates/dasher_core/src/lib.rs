pub mod animation;
pub mod input;
pub mod rect;
pub mod time;

pub use animation::{advance, SpriteAnim};
pub use rect::Rect;
