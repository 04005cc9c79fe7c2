//! egui GUI integration
//!
//! Drives the debug panel: winit input in, wgpu draw calls out.

mod wgpu;

pub use self::wgpu::WgpuEguiIntegration;
