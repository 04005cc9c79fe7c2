//! Mesh data structures and primitive generation
//!
//! All generators produce counter-clockwise front faces and unit normals.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Vertex with position, normal and UV
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A mesh with vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub name: String,
}

impl Mesh {
    pub fn new(name: &str) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            name: name.to_string(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get vertex data as bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Get index data as bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned box centered at the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let mut mesh = Mesh::new("box");

        // Unit cube corners, scaled below
        let faces = [
            // Front face
            (Vec3::new(-0.5, -0.5, 0.5), Vec3::Z, Vec2::new(0.0, 1.0)),
            (Vec3::new(0.5, -0.5, 0.5), Vec3::Z, Vec2::new(1.0, 1.0)),
            (Vec3::new(0.5, 0.5, 0.5), Vec3::Z, Vec2::new(1.0, 0.0)),
            (Vec3::new(-0.5, 0.5, 0.5), Vec3::Z, Vec2::new(0.0, 0.0)),
            // Back face
            (Vec3::new(0.5, -0.5, -0.5), -Vec3::Z, Vec2::new(0.0, 1.0)),
            (Vec3::new(-0.5, -0.5, -0.5), -Vec3::Z, Vec2::new(1.0, 1.0)),
            (Vec3::new(-0.5, 0.5, -0.5), -Vec3::Z, Vec2::new(1.0, 0.0)),
            (Vec3::new(0.5, 0.5, -0.5), -Vec3::Z, Vec2::new(0.0, 0.0)),
            // Right face
            (Vec3::new(0.5, -0.5, 0.5), Vec3::X, Vec2::new(0.0, 1.0)),
            (Vec3::new(0.5, -0.5, -0.5), Vec3::X, Vec2::new(1.0, 1.0)),
            (Vec3::new(0.5, 0.5, -0.5), Vec3::X, Vec2::new(1.0, 0.0)),
            (Vec3::new(0.5, 0.5, 0.5), Vec3::X, Vec2::new(0.0, 0.0)),
            // Left face
            (Vec3::new(-0.5, -0.5, -0.5), -Vec3::X, Vec2::new(0.0, 1.0)),
            (Vec3::new(-0.5, -0.5, 0.5), -Vec3::X, Vec2::new(1.0, 1.0)),
            (Vec3::new(-0.5, 0.5, 0.5), -Vec3::X, Vec2::new(1.0, 0.0)),
            (Vec3::new(-0.5, 0.5, -0.5), -Vec3::X, Vec2::new(0.0, 0.0)),
            // Top face
            (Vec3::new(-0.5, 0.5, 0.5), Vec3::Y, Vec2::new(0.0, 1.0)),
            (Vec3::new(0.5, 0.5, 0.5), Vec3::Y, Vec2::new(1.0, 1.0)),
            (Vec3::new(0.5, 0.5, -0.5), Vec3::Y, Vec2::new(1.0, 0.0)),
            (Vec3::new(-0.5, 0.5, -0.5), Vec3::Y, Vec2::new(0.0, 0.0)),
            // Bottom face
            (Vec3::new(-0.5, -0.5, -0.5), -Vec3::Y, Vec2::new(0.0, 1.0)),
            (Vec3::new(0.5, -0.5, -0.5), -Vec3::Y, Vec2::new(1.0, 1.0)),
            (Vec3::new(0.5, -0.5, 0.5), -Vec3::Y, Vec2::new(1.0, 0.0)),
            (Vec3::new(-0.5, -0.5, 0.5), -Vec3::Y, Vec2::new(0.0, 0.0)),
        ];

        let size = Vec3::new(width, height, depth);
        for (corner, normal, uv) in faces {
            mesh.vertices.push(Vertex {
                position: corner * size,
                normal,
                uv,
            });
        }

        for face in 0..6 {
            let base = face * 4;
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }

    /// UV sphere. Pole rows emit a single triangle per segment.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut mesh = Mesh::new("sphere");
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;

                let normal = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );

                mesh.vertices.push(Vertex {
                    position: normal * radius,
                    normal,
                    uv: Vec2::new(u, 1.0 - v),
                });
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }

    /// Torus around the Z axis. `radius` is the ring radius, `tube` the
    /// radius of the tube itself.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut mesh = Mesh::new("torus");
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;

                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);

                mesh.vertices.push(Vertex {
                    position,
                    normal: (position - center).normalize(),
                    uv: Vec2::new(
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ),
                });
            }
        }

        let row = tubular_segments + 1;
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;

                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        mesh
    }

    /// Single quad in the XY plane facing +Z
    pub fn plane(width: f32, height: f32) -> Self {
        let mut mesh = Mesh::new("plane");
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        for iy in 0..=1u32 {
            for ix in 0..=1u32 {
                mesh.vertices.push(Vertex {
                    position: Vec3::new(
                        ix as f32 * width - half_width,
                        half_height - iy as f32 * height,
                        0.0,
                    ),
                    normal: Vec3::Z,
                    uv: Vec2::new(ix as f32, 1.0 - iy as f32),
                });
            }
        }

        // a = top-left, b = bottom-left, c = bottom-right, d = top-right
        let (a, b, c, d) = (0, 2, 3, 1);
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_unit_normals(mesh: &Mesh) {
        for v in &mesh.vertices {
            assert_abs_diff_eq!(v.normal.length(), 1.0, epsilon = 1e-4);
        }
    }

    fn assert_indices_in_bounds(mesh: &Mesh) {
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.index_count() % 3, 0);
    }

    /// Every triangle's winding agrees with the vertex normals (front faces CCW)
    fn assert_outward_winding(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let face = (b.position - a.position).cross(c.position - a.position);
            if face.length_squared() < 1e-12 {
                continue;
            }
            let normal = a.normal + b.normal + c.normal;
            assert!(face.dot(normal) > 0.0, "inward triangle in {}", mesh.name);
        }
    }

    #[test]
    fn cuboid_counts_and_extent() {
        let mesh = Mesh::cuboid(0.75, 0.75, 0.75);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.vertices.iter().all(|v| v.position.abs().max_element() == 0.375));
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn sphere_counts_and_radius() {
        let mesh = Mesh::sphere(0.5, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.index_count(), 6 * 32 * 31);
        for v in &mesh.vertices {
            assert_abs_diff_eq!(v.position.length(), 0.5, epsilon = 1e-4);
        }
        assert_unit_normals(&mesh);
        assert_indices_in_bounds(&mesh);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn torus_counts() {
        let mesh = Mesh::torus(0.3, 0.2, 32, 64);
        assert_eq!(mesh.vertex_count(), 33 * 65);
        assert_eq!(mesh.index_count(), 6 * 32 * 64);
        assert_unit_normals(&mesh);
        assert_indices_in_bounds(&mesh);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn plane_is_a_single_quad() {
        let mesh = Mesh::plane(5.0, 5.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices.iter().all(|v| v.position.z == 0.0));
        assert_outward_winding(&mesh);
    }

    #[test]
    fn vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::layout().array_stride, 32);
        assert_eq!(Mesh::plane(1.0, 1.0).vertex_bytes().len(), 4 * 32);
    }
}
