//! Window creation and viewport tracking

use std::sync::Arc;

use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::{DemoConfig, DemoError};

/// Device pixel ratios above this are rendered at this ratio
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Current drawable size and display scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in physical pixels
    pub width: u32,
    /// Height in physical pixels
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn from_window(window: &Window) -> Self {
        let size = window.inner_size();
        Self::new(size.width, size.height, window.scale_factor())
    }

    /// Scale factor used for rendering, capped at [`MAX_PIXEL_RATIO`]
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.width = size.width;
        self.height = size.height;
    }

    /// Physical size rendered at [`Self::pixel_ratio`] instead of the full
    /// scale factor
    pub fn capped_size(&self) -> (u32, u32) {
        if self.scale_factor <= MAX_PIXEL_RATIO {
            return (self.width, self.height);
        }
        let ratio = MAX_PIXEL_RATIO / self.scale_factor;
        (
            ((self.width as f64 * ratio).round() as u32).max(1),
            ((self.height as f64 * ratio).round() as u32).max(1),
        )
    }

    /// Size the render surface is configured at.
    ///
    /// The browser canvas renders at the capped pixel ratio. Native surfaces
    /// must match the window, so they use the full physical size.
    pub fn surface_size(&self) -> (u32, u32) {
        if cfg!(target_arch = "wasm32") {
            self.capped_size()
        } else {
            (self.width, self.height)
        }
    }
}

/// Create the demo window
pub fn create_window(
    event_loop: &EventLoop<()>,
    config: &DemoConfig,
) -> Result<Arc<Window>, DemoError> {
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(event_loop)?;
    Ok(Arc::new(window))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(Viewport::new(800, 600, 1.0).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(800, 600, 1.5).pixel_ratio(), 1.5);
        assert_eq!(Viewport::new(800, 600, 3.0).pixel_ratio(), 2.0);
    }

    #[test]
    fn minimized_viewport_is_empty() {
        assert!(!Viewport::new(1280, 720, 1.0).is_empty());
        assert!(Viewport::new(0, 720, 1.0).is_empty());
        assert!(Viewport::new(1280, 0, 1.0).is_empty());
    }

    #[test]
    fn resize_updates_size_only() {
        let mut viewport = Viewport::new(100, 100, 2.0);
        viewport.resize(PhysicalSize::new(640, 480));
        assert_eq!(viewport, Viewport::new(640, 480, 2.0));
    }

    #[test]
    fn capped_size_scales_down_dense_displays() {
        // 1000x800 CSS pixels at a ratio of 3
        let viewport = Viewport::new(3000, 2400, 3.0);
        assert_eq!(viewport.capped_size(), (2000, 1600));

        assert_eq!(Viewport::new(1200, 900, 1.5).capped_size(), (1200, 900));
        assert_eq!(Viewport::new(1, 1, 4.0).capped_size(), (1, 1));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_surface_matches_window() {
        assert_eq!(Viewport::new(3000, 2400, 3.0).surface_size(), (3000, 2400));
    }
}
