//! Surface materials

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Roughness/metalness surface description shared by lit meshes
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    /// Linear RGB albedo
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
        }
    }
}

impl StandardMaterial {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Create a uniform data struct for GPU
    pub fn uniform_data(&self) -> MaterialUniformData {
        MaterialUniformData {
            color: self.color.extend(1.0),
            params: Vec4::new(self.roughness, self.metalness, 0.0, 0.0),
        }
    }
}

/// Material uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniformData {
    pub color: Vec4,
    /// x = roughness, y = metalness
    pub params: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_parameters() {
        let material = StandardMaterial::new("floor")
            .with_roughness(1.7);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.metalness, 0.0);
        assert_eq!(material.name, "floor");
    }

    #[test]
    fn uniform_layout() {
        let data = StandardMaterial::default().with_roughness(0.4).uniform_data();
        assert_eq!(data.params.x, 0.4);
        assert_eq!(data.color, Vec4::ONE);
    }
}
