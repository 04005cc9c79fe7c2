//! Object transforms

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Position, orientation and scale of an object in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder variant of [`Transform::set_euler`]
    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.set_euler(euler);
        self
    }

    /// Replace the orientation with XYZ-ordered euler angles (radians)
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
    }

    /// Current orientation as XYZ-ordered euler angles (radians)
    pub fn euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Get the model matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get forward direction (local -Z in world space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Point local -Z at `target`. No-op when the target is the current position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        // Looking straight along `up` leaves the roll undefined, pick another reference
        let up = if forward.cross(up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            up
        };
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);

        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));
    }

    /// Build uniform data for shaders
    pub fn uniform_data(&self) -> TransformUniformData {
        let model = self.matrix();
        TransformUniformData {
            model,
            normal_matrix: model.inverse().transpose(),
        }
    }
}

/// Transform uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformUniformData {
    pub model: Mat4,
    pub normal_matrix: Mat4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn euler_round_trips_small_angles() {
        let t = Transform::new().with_euler(Vec3::new(0.15, 0.1, 0.0));
        let e = t.euler();
        assert_abs_diff_eq!(e.x, 0.15, epsilon = 1e-5);
        assert_abs_diff_eq!(e.y, 0.1, epsilon = 1e-5);
        assert_abs_diff_eq!(e.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn plane_rotation_lays_normal_up() {
        let t = Transform::new().with_euler(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        // A plane built in XY faces +Z; after the rotation it must face +Y
        let n = t.rotation * Vec3::Z;
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_handles_vertical_targets() {
        let mut t = Transform::from_position(Vec3::new(0.0, 2.0, 0.0));
        t.look_at(Vec3::ZERO, Vec3::Y);
        let f = t.forward();
        assert_abs_diff_eq!(f.y, -1.0, epsilon = 1e-5);
        assert!(t.rotation.is_normalized());
    }

    #[test]
    fn look_at_self_is_noop() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }
}
