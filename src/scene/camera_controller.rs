//! Orbit camera controls
//!
//! Rotates the camera around a target point on a sphere:
//! - Left drag: orbit around the target
//! - Right drag: pan the target in the view plane
//! - Scroll: dolly in/out
//!
//! With damping enabled the motion eases out over several frames, so
//! [`OrbitController::update`] has to run once per frame even without input.

use glam::{Vec2, Vec3};

use super::Camera;

/// Input state for the camera controller, accumulated between frames
#[derive(Debug, Clone, Default)]
pub struct CameraInput {
    /// Mouse delta since last frame (in pixels)
    pub mouse_delta: Vec2,

    /// Mouse scroll delta (positive = scroll up / zoom in)
    pub scroll_delta: f32,

    /// Left mouse button held
    pub rotate_active: bool,

    /// Right mouse button held
    pub pan_active: bool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame deltas (call after update)
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

/// Spherical coordinates around +Y: `theta` is the azimuth measured from +Z,
/// `phi` the polar angle measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit camera controller with optional inertial damping
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Point the camera orbits around
    pub target: Vec3,
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame when damping
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    // Pending motion
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.1,
            max_distance: 100.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

const MIN_POLAR: f32 = 1e-6;
const MAX_POLAR: f32 = std::f32::consts::PI - 1e-6;

impl OrbitController {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.enable_damping = enabled;
        self
    }

    /// Queue an azimuth rotation (radians)
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a polar rotation (radians)
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Queue a dolly; factors below one move closer
    pub fn dolly(&mut self, factor: f32) {
        self.scale *= factor;
    }

    /// Queue a world-space shift of both camera and target
    pub fn pan(&mut self, offset: Vec3) {
        self.pan_offset += offset;
    }

    /// Translate accumulated pointer input into pending motion.
    ///
    /// Pixel deltas are scaled by the viewport height so a drag across the
    /// full height orbits one full turn regardless of window size.
    pub fn handle_input(&mut self, camera: &Camera, input: &CameraInput, viewport_height: f32) {
        let height = viewport_height.max(1.0);

        if input.rotate_active && input.mouse_delta != Vec2::ZERO {
            let tau = std::f32::consts::TAU;
            self.rotate_left(tau * input.mouse_delta.x / height * self.rotate_speed);
            self.rotate_up(tau * input.mouse_delta.y / height * self.rotate_speed);
        }

        if input.pan_active && input.mouse_delta != Vec2::ZERO {
            let offset = camera.position - self.target;
            // Half the visible height at the target distance
            let target_distance = offset.length() * (camera.projection.fov_y / 2.0).tan();
            let scale = 2.0 * target_distance / height * self.pan_speed;

            let forward = (self.target - camera.position).normalize_or_zero();
            let right = forward.cross(camera.up).normalize_or_zero();
            let up = right.cross(forward);

            self.pan(-right * input.mouse_delta.x * scale + up * input.mouse_delta.y * scale);
        }

        if input.scroll_delta != 0.0 {
            let step = 0.95f32.powf(self.zoom_speed * input.scroll_delta.abs());
            if input.scroll_delta > 0.0 {
                self.dolly(step);
            } else {
                self.dolly(1.0 / step);
            }
        }
    }

    /// Apply pending motion to the camera. Call once per frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let blend = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.delta_theta * blend;
        spherical.phi = (spherical.phi + self.delta_phi * blend).clamp(MIN_POLAR, MAX_POLAR);
        spherical.radius =
            (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * blend;

        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }

    /// Forget any pending motion
    pub fn reset(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn azimuth(camera: &Camera) -> f32 {
        let offset = camera.position - camera.target;
        offset.x.atan2(offset.z)
    }

    #[test]
    fn idle_update_keeps_camera_in_place() {
        let mut camera = Camera::default();
        let start = camera.position;
        let mut controls = OrbitController::default();
        for _ in 0..10 {
            controls.update(&mut camera);
        }
        assert_abs_diff_eq!(camera.position.x, start.x, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.y, start.y, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, start.z, epsilon = 1e-4);
    }

    #[test]
    fn damped_rotation_eases_toward_full_angle() {
        let mut camera = Camera::default();
        let start = azimuth(&camera);
        let mut controls = OrbitController::default();
        controls.rotate_left(0.5);

        controls.update(&mut camera);
        let first_step = start - azimuth(&camera);
        assert_abs_diff_eq!(first_step, 0.5 * 0.05, epsilon = 1e-4);

        for _ in 0..400 {
            controls.update(&mut camera);
        }
        assert_abs_diff_eq!(start - azimuth(&camera), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut camera = Camera::default();
        let start = azimuth(&camera);
        let mut controls = OrbitController::default().with_damping(false);
        controls.rotate_left(0.25);
        controls.update(&mut camera);
        assert_abs_diff_eq!(start - azimuth(&camera), 0.25, epsilon = 1e-4);
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::default();
        controls.dolly(0.001);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.position.length(), controls.min_distance, epsilon = 1e-4);

        controls.dolly(1e6);
        controls.update(&mut camera);
        assert_abs_diff_eq!(camera.position.length(), controls.max_distance, epsilon = 1e-2);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::default().with_damping(false);
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        // Clamped just short of straight up rather than wrapping to the far side
        assert!(camera.position.y > 2.0);
        assert_abs_diff_eq!(camera.position.x, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(camera.position.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn scroll_up_moves_closer() {
        let mut camera = Camera::default();
        let start = camera.position.length();
        let mut controls = OrbitController::default().with_damping(false);
        let input = CameraInput {
            scroll_delta: 1.0,
            ..Default::default()
        };
        controls.handle_input(&camera, &input, 720.0);
        controls.update(&mut camera);
        assert!(camera.position.length() < start);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = Camera::default();
        let mut controls = OrbitController::default().with_damping(false);
        let before = camera.position - camera.target;
        let input = CameraInput {
            mouse_delta: Vec2::new(40.0, 0.0),
            pan_active: true,
            ..Default::default()
        };
        controls.handle_input(&camera, &input, 720.0);
        controls.update(&mut camera);

        assert!(controls.target.length() > 0.0);
        let after = camera.position - camera.target;
        assert_abs_diff_eq!(before.x, after.x, epsilon = 1e-4);
        assert_abs_diff_eq!(before.y, after.y, epsilon = 1e-4);
        assert_abs_diff_eq!(before.z, after.z, epsilon = 1e-4);
    }
}
