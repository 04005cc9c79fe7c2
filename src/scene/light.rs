//! Light types for the scene
//!
//! The demo carries exactly one light of each kind. They live together in a
//! [`LightRig`], which is what the lighting presets and the debug panel
//! mutate, and what the renderer packs into a single uniform block.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3, Vec4};

use super::Transform;

/// Convert a `0xRRGGBB` sRGB color to linear RGB.
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Uniform light applied equally to every surface
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: color_from_hex(0xffaaee),
            intensity: 0.3,
        }
    }
}

/// Omnidirectional light with a finite falloff range
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    /// Range at which the light reaches zero. Zero means unbounded.
    pub distance: f32,
    /// Exponent of the inverse-distance falloff
    pub decay: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: color_from_hex(0xffddaa),
            intensity: 0.5,
            position: Vec3::new(0.0, 1.0, 1.0),
            distance: 5.0,
            decay: 2.0,
        }
    }
}

/// Parallel light shining from `position` toward `target`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.3,
            position: Vec3::Y,
            target: Vec3::ZERO,
        }
    }
}

impl DirectionalLight {
    /// Direction the light travels in. Falls back to straight down when
    /// position and target coincide.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(-Vec3::Y)
    }
}

/// Sky/ground gradient light, blended by the surface normal's up component
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky_color: Vec3,
    pub ground_color: Vec3,
    pub intensity: f32,
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky_color: color_from_hex(0xff0000),
            ground_color: color_from_hex(0x0000ff),
            intensity: 0.5,
        }
    }
}

/// One-sided rectangular emitter
#[derive(Debug, Clone, PartialEq)]
pub struct RectAreaLight {
    pub color: Vec3,
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for RectAreaLight {
    fn default() -> Self {
        Self {
            color: color_from_hex(0x0000ff),
            intensity: 3.0,
            width: 1.0,
            height: 1.0,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl RectAreaLight {
    /// Emitting direction (local -Z)
    pub fn normal(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Orient the emitting face toward `target`.
    ///
    /// A target at the light's own position has no direction; the light then
    /// falls back to its rest orientation, emitting along -Z.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() < 1e-12 {
            self.rotation = Quat::IDENTITY;
            return;
        }
        let mut transform = Transform::from_position_rotation(self.position, self.rotation);
        transform.look_at(target, Vec3::Y);
        self.rotation = transform.rotation;
    }
}

/// The full set of lights in the demo scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub point: PointLight,
    pub directional: DirectionalLight,
    pub hemisphere: HemisphereLight,
    pub area: RectAreaLight,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of individual lights in the rig
    pub fn light_count(&self) -> usize {
        5
    }

    /// Pack every light into the shader's uniform layout
    pub fn uniform_data(&self) -> LightsUniformData {
        let ambient = self.ambient.color * self.ambient.intensity;
        let dir = self.directional.direction();
        let area_normal = self.area.normal();

        LightsUniformData {
            ambient: ambient.extend(0.0),
            hemisphere_sky: self.hemisphere.sky_color.extend(self.hemisphere.intensity),
            hemisphere_ground: self.hemisphere.ground_color.extend(0.0),
            directional_direction: dir.extend(0.0),
            directional_color: self.directional.color.extend(self.directional.intensity),
            point_position: self.point.position.extend(self.point.distance),
            point_color: self.point.color.extend(self.point.intensity),
            point_params: Vec4::new(self.point.decay, 0.0, 0.0, 0.0),
            area_position: self.area.position.extend(0.0),
            area_normal: area_normal.extend(0.0),
            area_color: self.area.color.extend(self.area.intensity),
            area_size: Vec4::new(self.area.width, self.area.height, 0.0, 0.0),
        }
    }
}

/// GPU-friendly light block, every field padded to a vec4
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightsUniformData {
    /// rgb = color * intensity
    pub ambient: Vec4,
    /// rgb = sky color, w = intensity
    pub hemisphere_sky: Vec4,
    /// rgb = ground color
    pub hemisphere_ground: Vec4,
    /// xyz = direction of travel
    pub directional_direction: Vec4,
    /// rgb = color, w = intensity
    pub directional_color: Vec4,
    /// xyz = position, w = distance
    pub point_position: Vec4,
    /// rgb = color, w = intensity
    pub point_color: Vec4,
    /// x = decay
    pub point_params: Vec4,
    pub area_position: Vec4,
    pub area_normal: Vec4,
    /// rgb = color, w = intensity
    pub area_color: Vec4,
    /// x = width, y = height
    pub area_size: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hex_colors_convert_to_linear() {
        assert_eq!(color_from_hex(0xffffff), Vec3::ONE);
        assert_eq!(color_from_hex(0x000000), Vec3::ZERO);
        let blue = color_from_hex(0x0000ff);
        assert_eq!(blue, Vec3::new(0.0, 0.0, 1.0));
        let mid = color_from_hex(0x808080);
        assert_relative_eq!(mid.x, 0.2158605, epsilon = 1e-5);
    }

    #[test]
    fn default_rig_matches_scene_setup() {
        let rig = LightRig::new();
        assert_eq!(rig.ambient.intensity, 0.3);
        assert_eq!(rig.point.intensity, 0.5);
        assert_eq!(rig.point.distance, 5.0);
        assert_eq!(rig.point.decay, 2.0);
        assert_eq!(rig.point.position, Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(rig.directional.intensity, 0.3);
        assert_eq!(rig.hemisphere.intensity, 0.5);
        assert_eq!(rig.area.intensity, 3.0);
        assert_eq!(rig.area.width, 1.0);
        assert_eq!(rig.area.height, 1.0);
        assert_eq!(rig.light_count(), 5);
    }

    #[test]
    fn directional_direction_points_at_target() {
        let light = DirectionalLight::default();
        assert_eq!(light.direction(), -Vec3::Y);

        let degenerate = DirectionalLight {
            position: Vec3::ONE,
            target: Vec3::ONE,
            ..Default::default()
        };
        assert_eq!(degenerate.direction(), -Vec3::Y);
    }

    #[test]
    fn area_light_faces_look_at_target() {
        let mut light = RectAreaLight {
            position: Vec3::new(0.0, 1.0, 1.0),
            ..Default::default()
        };
        light.look_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - light.position).normalize();
        assert_relative_eq!(light.normal().x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(light.normal().y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(light.normal().z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn area_light_on_target_rests_facing_negative_z() {
        let mut light = RectAreaLight::default();
        light.look_at(Vec3::ZERO);
        assert_eq!(light.normal(), -Vec3::Z);

        // Aimed elsewhere first, then moved onto the target
        light.position = Vec3::new(0.0, 1.0, 1.0);
        light.look_at(Vec3::ZERO);
        light.position = Vec3::ZERO;
        light.look_at(Vec3::ZERO);
        assert_eq!(light.rotation, Quat::IDENTITY);
    }

    #[test]
    fn uniform_packs_point_distance_and_decay() {
        let mut rig = LightRig::new();
        rig.point.distance = 3.5;
        let data = rig.uniform_data();
        assert_eq!(data.point_position.w, 3.5);
        assert_eq!(data.point_params.x, 2.0);
        assert_eq!(data.area_color.w, 3.0);
        assert_eq!(std::mem::size_of::<LightsUniformData>(), 12 * 16);
    }
}
