use glam::{Mat4, Vec2, Vec4};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space camera: origin at the top-left corner, y grows downward.
pub struct ScreenCamera {
    pub viewport: (u32, u32),
}

impl ScreenCamera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32)
    }

    pub fn projection(&self) -> Mat4 {
        let size = self.size().max(Vec2::ONE);
        Mat4::orthographic_rh(0.0, size.x, size.y, 0.0, -1.0, 1.0)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }

    pub fn to_clip(&self, point: Vec2) -> Vec2 {
        let clip = self.projection() * Vec4::new(point.x, point.y, 0.0, 1.0);
        Vec2::new(clip.x, clip.y)
    }
}
