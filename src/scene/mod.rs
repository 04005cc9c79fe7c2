//! Scene management

mod camera;
mod camera_controller;
mod light;
mod transform;

pub use camera::*;
pub use camera_controller::*;
pub use light::*;
pub use transform::*;

use glam::Vec3;

/// A renderable object in the scene
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub mesh_id: usize,
    pub material_id: usize,
    pub transform: Transform,
}

impl RenderObject {
    pub fn new(mesh_id: usize, material_id: usize) -> Self {
        Self {
            mesh_id,
            material_id,
            transform: Transform::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

/// The scene containing all renderable content
pub struct Scene {
    pub camera: Camera,
    pub lights: LightRig,
    pub objects: Vec<RenderObject>,
    /// Linear RGB clear color
    pub background: Vec3,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            lights: LightRig::default(),
            objects: Vec::new(),
            background: Vec3::ZERO,
        }
    }

    /// Add a render object to the scene
    pub fn add_object(&mut self, object: RenderObject) -> usize {
        let id = self.objects.len();
        self.objects.push(object);
        id
    }

    pub fn object(&self, id: usize) -> Option<&RenderObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: usize) -> Option<&mut RenderObject> {
        self.objects.get_mut(id)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
