//! CPU-side sprite mesh for one presented frame.
//!
//! The whole scene is a handful of textured quads, rebuilt from the world
//! state after each simulated frame and streamed into one vertex and one
//! index buffer. Quads are emitted back to front: the three background
//! layers (two tiles each), then, while the run is live, the obstacles and
//! the player.

use dasher_core::{Rect, SpriteAnim};
use dasher_render::SpriteVertex;

use crate::assets::{TextureId, TextureSizes};
use crate::outcome::Outcome;
use crate::world::World;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: TextureId,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FrameMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl FrameMesh {
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Bind-group switches the render pass will perform.
    pub fn texture_binds(&self) -> usize {
        let mut binds = 0usize;
        let mut current: Option<TextureId> = None;
        for draw in &self.draw_calls {
            if current != Some(draw.texture) {
                current = Some(draw.texture);
                binds += 1;
            }
        }
        binds
    }

    fn add_quad(&mut self, texture: TextureId, dest: Rect, uv: Rect) {
        let base_index = self.vertices.len() as u32;
        let corners = [
            ([dest.x, dest.y], [uv.x, uv.y]),
            ([dest.right(), dest.y], [uv.right(), uv.y]),
            ([dest.right(), dest.bottom()], [uv.right(), uv.bottom()]),
            ([dest.x, dest.bottom()], [uv.x, uv.bottom()]),
        ];
        for (position, tex_coords) in corners {
            self.vertices.push(SpriteVertex {
                position,
                tex_coords,
                color: WHITE,
            });
        }

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
        self.push_draw_call(texture, draw_start, 6);
    }

    /// Append a draw call, merging with the previous one when the texture
    /// matches and the indices are contiguous.
    fn push_draw_call(&mut self, texture: TextureId, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.texture == texture && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture,
            index_start,
            index_count,
        });
    }

    fn add_sprite(&mut self, texture: TextureId, sprite: &SpriteAnim, sheet_size: (u32, u32)) {
        self.add_quad(
            texture,
            sprite.bounds(),
            normalized_source(&sprite.source, sheet_size),
        );
    }
}

/// Source rectangle in pixels to texture coordinates.
fn normalized_source(source: &Rect, (width, height): (u32, u32)) -> Rect {
    if width == 0 || height == 0 {
        return Rect::new(0.0, 0.0, 1.0, 1.0);
    }
    let (w, h) = (width as f32, height as f32);
    Rect::new(source.x / w, source.y / h, source.width / w, source.height / h)
}

pub fn build_frame(world: &World, sizes: &TextureSizes) -> FrameMesh {
    let mut mesh = FrameMesh::default();
    let full = Rect::new(0.0, 0.0, 1.0, 1.0);

    for (layer, texture) in world.layers.iter().zip(TextureId::LAYERS) {
        let height = sizes.get(texture).1 as f32 * world.config.layer_scale;
        for x in layer.tile_positions() {
            mesh.add_quad(texture, Rect::new(x, 0.0, layer.wrap_width, height), full);
        }
    }

    if Outcome::of(world).shows_sprites() {
        for obstacle in &world.obstacles {
            mesh.add_sprite(TextureId::Obstacle, obstacle, sizes.get(TextureId::Obstacle));
        }
        mesh.add_sprite(
            TextureId::Player,
            &world.player.sprite,
            sizes.get(TextureId::Player),
        );
    }

    mesh
}
