use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Screen-space camera: `position` is the top-left corner of the view and y
/// grows downward, matching the coordinates the simulation works in.
///
/// `viewport` is the logical size of the play field, not the surface size, so
/// the scene scales with the window's DPI instead of revealing more of it.
pub struct Camera2D {
    pub position: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn projection(&self) -> Mat4 {
        let width = self.viewport.0 as f32;
        let height = self.viewport.1 as f32;

        // Bottom edge maps to y = height, top edge to y = 0.
        Mat4::orthographic_rh(
            self.position.x,
            self.position.x + width,
            self.position.y + height,
            self.position.y,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}
