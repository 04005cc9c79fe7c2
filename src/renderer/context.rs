//! GPU device and presentation surface

use super::{RenderError, RenderResult};
use std::sync::Arc;

/// Instance, adapter, device and configured window surface
pub struct GpuContext {
    #[allow(dead_code)]
    instance: wgpu::Instance,
    #[allow(dead_code)]
    adapter: wgpu::Adapter,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
}

type InitParts = (
    wgpu::Instance,
    wgpu::Surface<'static>,
    wgpu::Adapter,
    wgpu::Device,
    wgpu::Queue,
);

impl GpuContext {
    pub async fn new_async(window: Arc<winit::window::Window>, vsync: bool) -> RenderResult<Self> {
        #[cfg(target_arch = "wasm32")]
        let (instance, surface, adapter, device, queue) = Self::init_web(window.clone()).await?;

        #[cfg(not(target_arch = "wasm32"))]
        let (instance, surface, adapter, device, queue) = Self::init_native(window.clone()).await?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| {
                RenderError::SurfaceCreationFailed("surface reports no formats".into())
            })?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let (width, height) = clamp_surface_size(
            size.width,
            size.height,
            device.limits().max_texture_dimension_2d,
        );

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}x{} {:?} ({:?})",
            width,
            height,
            surface_format,
            present_mode
        );

        Ok(Self {
            instance,
            adapter,
            surface,
            device,
            queue,
            surface_config,
        })
    }

    /// Reconfigure the surface for a new window size; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let (width, height) =
            clamp_surface_size(width, height, self.device.limits().max_texture_dimension_2d);
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        true
    }

    /// Configure again with the current size, after a lost or outdated surface
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Web initialization: WebGL2 first, WebGPU as fallback
    #[cfg(target_arch = "wasm32")]
    async fn init_web(window: Arc<winit::window::Window>) -> RenderResult<InitParts> {
        log::info!("Trying WebGL2 backend...");
        match Self::try_init_backend(
            window.clone(),
            wgpu::Backends::GL,
            wgpu::Limits::downlevel_webgl2_defaults(),
            "WebGL2",
        )
        .await
        {
            Ok(parts) => return Ok(parts),
            Err(e) => log::warn!("WebGL2 unavailable: {}", e),
        }

        log::info!("Trying WebGPU backend...");
        match Self::try_init_backend(
            window,
            wgpu::Backends::BROWSER_WEBGPU,
            wgpu::Limits::default(),
            "WebGPU",
        )
        .await
        {
            Ok(parts) => Ok(parts),
            Err(e) => {
                log::error!("WebGPU unavailable: {}", e);
                Err(RenderError::InitializationFailed(
                    "Neither WebGL2 nor WebGPU backends could be initialized".into(),
                ))
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn try_init_backend(
        window: Arc<winit::window::Window>,
        backends: wgpu::Backends,
        limits: wgpu::Limits,
        backend_name: &str,
    ) -> RenderResult<InitParts> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreationFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                RenderError::InitializationFailed(format!("No {} adapter found", backend_name))
            })?;

        let info = adapter.get_info();
        log::info!("Found adapter: {} ({:?} backend)", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lighting Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: limits.using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceCreationFailed(e.to_string()))?;

        Ok((instance, surface, adapter, device, queue))
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn init_native(window: Arc<winit::window::Window>) -> RenderResult<InitParts> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::util::backend_bits_from_env().unwrap_or_else(wgpu::Backends::all),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreationFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::InitializationFailed("No suitable adapter found".into()))?;

        let info = adapter.get_info();
        log::info!("Selected GPU: {} ({:?} backend)", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Lighting Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceCreationFailed(e.to_string()))?;

        Ok((instance, surface, adapter, device, queue))
    }
}

/// Fit a surface size inside the device's texture limit, keeping aspect ratio.
/// Never returns a zero dimension.
pub fn clamp_surface_size(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    if width > max_size || height > max_size {
        let scale = (max_size as f32 / width as f32).min(max_size as f32 / height as f32);
        (
            ((width as f32 * scale) as u32).clamp(1, max_size),
            ((height as f32 * scale) as u32).clamp(1, max_size),
        )
    } else {
        (width.max(1), height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_pass_through() {
        assert_eq!(clamp_surface_size(1280, 720, 8192), (1280, 720));
    }

    #[test]
    fn zero_is_raised_to_one() {
        assert_eq!(clamp_surface_size(0, 0, 2048), (1, 1));
    }

    #[test]
    fn oversized_keeps_aspect() {
        let (w, h) = clamp_surface_size(8192, 4096, 2048);
        assert_eq!((w, h), (2048, 1024));
    }

    #[test]
    fn tall_surface_clamps_height() {
        let (w, h) = clamp_surface_size(1000, 5000, 2500);
        assert_eq!(h, 2500);
        assert_eq!(w, 500);
    }
}
