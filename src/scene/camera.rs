//! Camera system

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Camera for viewing the scene
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, 1.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::default(),
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }

    /// Build camera uniform data for shaders
    pub fn uniform_data(&self) -> CameraUniformData {
        CameraUniformData {
            view_proj: self.view_projection_matrix(),
            position: self.position.extend(1.0),
            near_far: Vec4::new(self.projection.near, self.projection.far, 0.0, 0.0),
        }
    }

    /// Update aspect ratio from a viewport size. Zero-sized viewports are ignored.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.projection.aspect = width / height;
        }
    }
}

/// Camera uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniformData {
    pub view_proj: Mat4,
    pub position: Vec4,
    pub near_far: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_matches_demo_framing() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(1.0, 1.0, 2.0));
        assert_relative_eq!(camera.projection.fov_y, 75f32.to_radians());
        assert_eq!(camera.projection.near, 0.1);
        assert_eq!(camera.projection.far, 100.0);
    }

    #[test]
    fn aspect_follows_viewport() {
        let mut camera = Camera::default();
        camera.set_aspect(800.0, 400.0);
        assert_eq!(camera.projection.aspect, 2.0);
        camera.set_aspect(0.0, 400.0);
        assert_eq!(camera.projection.aspect, 2.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::default();
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        let ndc = clip / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    }
}
