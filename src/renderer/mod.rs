//! Forward renderer
//!
//! Draws every [`RenderObject`](crate::scene::RenderObject) of a [`Scene`] in one
//! depth-tested pass lit by the scene's [`LightRig`](crate::scene::LightRig), then
//! hands the frame to an overlay callback (the debug panel) before presenting.

mod context;
mod shader;

pub use context::{clamp_surface_size, GpuContext};
pub use shader::FORWARD_SHADER;

use crate::resources::{Mesh, StandardMaterial, Vertex};
use crate::scene::{CameraUniformData, LightsUniformData, Scene, TransformUniformData};
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to initialize renderer: {0}")]
    InitializationFailed(String),
    #[error("Failed to create surface: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to create device: {0}")]
    DeviceCreationFailed(String),
    #[error("Failed to acquire frame: {0}")]
    AcquireFrameFailed(String),
    #[error("Unknown mesh id {0}")]
    UnknownMesh(usize),
    #[error("Unknown material id {0}")]
    UnknownMaterial(usize),
    #[error("Out of memory")]
    OutOfMemory,
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Target handed to the overlay callback after the scene pass
pub struct OverlayTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
    pub size: (u32, u32),
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMaterial {
    bind_group: wgpu::BindGroup,
}

struct GpuObject {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu forward renderer owning the surface and all scene GPU resources
pub struct Renderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
    objects: Vec<GpuObject>,
}

impl Renderer {
    /// Async initialization; awaited directly on web, wrapped by `new` on native
    pub async fn new_async(window: Arc<winit::window::Window>, vsync: bool) -> RenderResult<Self> {
        let gpu = GpuContext::new_async(window, vsync).await?;
        let device = &gpu.device;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform"),
            size: std::mem::size_of::<CameraUniformData>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Uniform"),
            size: std::mem::size_of::<LightsUniformData>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = create_forward_pipeline(
            device,
            gpu.format(),
            &[&frame_layout, &object_layout, &material_layout],
        );

        let (width, height) = gpu.size();
        let depth_view = create_depth_view(device, width, height);

        Ok(Self {
            gpu,
            depth_view,
            pipeline,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            object_layout,
            material_layout,
            meshes: Vec::new(),
            materials: Vec::new(),
            objects: Vec::new(),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(window: Arc<winit::window::Window>, vsync: bool) -> RenderResult<Self> {
        pollster::block_on(Self::new_async(window, vsync))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.gpu.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.format()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    /// Upload a mesh, returning the id used by `RenderObject::mesh_id`
    pub fn add_mesh(&mut self, mesh: &Mesh) -> usize {
        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", mesh.name)),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", mesh.name)),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles",
            mesh.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let id = self.meshes.len();
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        });
        id
    }

    /// Upload a material, returning the id used by `RenderObject::material_id`
    pub fn add_material(&mut self, material: &StandardMaterial) -> usize {
        let buffer = self
            .gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Material", material.name)),
                contents: bytemuck::bytes_of(&material.uniform_data()),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let id = self.materials.len();
        self.materials.push(GpuMaterial { bind_group });
        id
    }

    /// Resize the surface and depth buffer. Zero sizes (minimized) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            let (width, height) = self.gpu.size();
            self.depth_view = create_depth_view(&self.gpu.device, width, height);
            log::debug!("Resized surface to {}x{}", width, height);
        }
    }

    /// Render one frame of `scene`, then let `overlay` record into the same encoder.
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render<F>(&mut self, scene: &Scene, overlay: F) -> RenderResult<()>
    where
        F: FnOnce(OverlayTarget<'_>),
    {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring frame, skipping");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            #[allow(unreachable_patterns)]
            Err(e) => return Err(RenderError::AcquireFrameFailed(e.to_string())),
        };

        self.sync_objects(scene);
        self.write_frame_uniforms(scene);

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.record_scene_pass(scene, &mut encoder, &view)?;

        overlay(OverlayTarget {
            device: &self.gpu.device,
            queue: &self.gpu.queue,
            encoder: &mut encoder,
            view: &view,
            size: self.gpu.size(),
        });

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Keep one transform uniform per scene object and refresh it
    fn sync_objects(&mut self, scene: &Scene) {
        while self.objects.len() < scene.objects.len() {
            let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Object Uniform"),
                size: std::mem::size_of::<TransformUniformData>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object Bind Group"),
                layout: &self.object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            self.objects.push(GpuObject { buffer, bind_group });
        }
        self.objects.truncate(scene.objects.len());

        for (object, gpu_object) in scene.objects.iter().zip(&self.objects) {
            self.gpu.queue.write_buffer(
                &gpu_object.buffer,
                0,
                bytemuck::bytes_of(&object.transform.uniform_data()),
            );
        }
    }

    fn write_frame_uniforms(&self, scene: &Scene) {
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&scene.camera.uniform_data()),
        );
        self.gpu.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::bytes_of(&scene.lights.uniform_data()),
        );
    }

    fn record_scene_pass(
        &self,
        scene: &Scene,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> RenderResult<()> {
        let bg = scene.background;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Forward Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: bg.x as f64,
                        g: bg.y as f64,
                        b: bg.z as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (object, gpu_object) in scene.objects.iter().zip(&self.objects) {
            let mesh = self
                .meshes
                .get(object.mesh_id)
                .ok_or(RenderError::UnknownMesh(object.mesh_id))?;
            let material = self
                .materials
                .get(object.material_id)
                .ok_or(RenderError::UnknownMaterial(object.material_id))?;

            pass.set_bind_group(1, &gpu_object.bind_group, &[]);
            pass.set_bind_group(2, &material.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        Ok(())
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_forward_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Forward Shader"),
        source: wgpu::ShaderSource::Wgsl(FORWARD_SHADER.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Forward Pipeline Layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Forward Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MaterialUniformData;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniformData>() % 16, 0);
        assert_eq!(std::mem::size_of::<LightsUniformData>() % 16, 0);
        assert_eq!(std::mem::size_of::<TransformUniformData>() % 16, 0);
        assert_eq!(std::mem::size_of::<MaterialUniformData>() % 16, 0);
    }

    #[test]
    fn shader_declares_entry_points_and_groups() {
        assert!(FORWARD_SHADER.contains("fn vs_main"));
        assert!(FORWARD_SHADER.contains("fn fs_main"));
        for group in 0..3 {
            assert!(FORWARD_SHADER.contains(&format!("@group({})", group)));
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(RenderError::UnknownMesh(3).to_string(), "Unknown mesh id 3");
        assert_eq!(RenderError::OutOfMemory.to_string(), "Out of memory");
    }
}
