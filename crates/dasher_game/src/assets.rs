//! Texture manifest and loading.
//!
//! All five textures are loaded once at startup. A missing or undecodable
//! file is not fatal: it is replaced by a checkerboard of the size the shipped
//! asset has, so sheet frame sizes and the ground line stay the same.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use dasher_render::{SpritePipeline, Texture};

pub const TEXTURE_ROOT: &str = "assets/textures";

const PLACEHOLDER_CELL: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Background,
    Midground,
    Foreground,
    Obstacle,
    Player,
}

impl TextureId {
    pub const ALL: [TextureId; 5] = [
        TextureId::Background,
        TextureId::Midground,
        TextureId::Foreground,
        TextureId::Obstacle,
        TextureId::Player,
    ];

    /// Scrolling layers, back to front.
    pub const LAYERS: [TextureId; 3] = [
        TextureId::Background,
        TextureId::Midground,
        TextureId::Foreground,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TextureId::Background => "far-buildings.png",
            TextureId::Midground => "back-buildings.png",
            TextureId::Foreground => "foreground.png",
            TextureId::Obstacle => "12_nebula_spritesheet.png",
            TextureId::Player => "scarfy.png",
        }
    }

    /// Pixel size of the shipped asset.
    pub fn expected_size(self) -> (u32, u32) {
        match self {
            TextureId::Background | TextureId::Midground => (256, 192),
            TextureId::Foreground => (352, 192),
            TextureId::Obstacle => (800, 800),
            TextureId::Player => (768, 128),
        }
    }

    fn index(self) -> usize {
        match self {
            TextureId::Background => 0,
            TextureId::Midground => 1,
            TextureId::Foreground => 2,
            TextureId::Obstacle => 3,
            TextureId::Player => 4,
        }
    }
}

/// Pixel dimensions of every loaded texture. The simulation derives frame
/// sizes, the ground line and layer wrap widths from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSizes {
    sizes: [(u32, u32); 5],
}

impl Default for TextureSizes {
    fn default() -> Self {
        let mut sizes = [(0, 0); 5];
        for id in TextureId::ALL {
            sizes[id.index()] = id.expected_size();
        }
        Self { sizes }
    }
}

impl TextureSizes {
    pub fn get(&self, id: TextureId) -> (u32, u32) {
        self.sizes[id.index()]
    }

    pub fn set(&mut self, id: TextureId, size: (u32, u32)) {
        self.sizes[id.index()] = size;
    }
}

/// Magenta/charcoal checkerboard used in place of an unreadable texture.
pub fn placeholder_pixels(width: u32, height: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(width, height, |x, y| {
        if (x / PLACEHOLDER_CELL + y / PLACEHOLDER_CELL) % 2 == 0 {
            image::Rgba([255, 0, 255, 255])
        } else {
            image::Rgba([40, 40, 40, 255])
        }
    })
}

pub struct GpuSpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

pub struct LoadedTextures {
    pub textures: HashMap<TextureId, GpuSpriteTexture>,
    pub sizes: TextureSizes,
}

impl LoadedTextures {
    pub fn total_bytes(&self) -> usize {
        self.textures
            .values()
            .map(|texture| texture.texture.byte_size())
            .sum()
    }
}

pub fn load_all_textures(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    root: &Path,
) -> LoadedTextures {
    let mut textures = HashMap::new();
    let mut sizes = TextureSizes::default();
    for id in TextureId::ALL {
        let texture = load_texture_asset(device, queue, id, root);
        sizes.set(id, texture.size);
        let bind_group = pipeline.create_texture_bind_group(device, &texture);
        textures.insert(
            id,
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }
    LoadedTextures { textures, sizes }
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    id: TextureId,
    root: &Path,
) -> Texture {
    let path = root.join(id.file_name());
    let label = id.file_name();

    let loaded = fs::read(&path)
        .map_err(|e| format!("Failed to read texture {}: {e}", path.display()))
        .and_then(|bytes| Texture::from_bytes(device, queue, &bytes, label));

    match loaded {
        Ok(texture) => {
            log::info!(
                "Loaded texture '{}' ({}x{})",
                path.display(),
                texture.size.0,
                texture.size.1
            );
            texture
        }
        Err(err) => {
            let (width, height) = id.expected_size();
            log::warn!("{err}. Using {width}x{height} placeholder.");
            let pixels = placeholder_pixels(width, height);
            Texture::from_rgba8(device, queue, pixels.as_raw(), width, height, label)
        }
    }
}
