//! Lighting Modes - a small lit scene with switchable lighting presets
//!
//! Four primitive meshes lit by ambient, point, directional, hemisphere and
//! rectangular area lights, rendered with wgpu. An egui panel tunes every
//! light and switches between two presets:
//! - **Dreamy** (calm): every light on at its soft default level
//! - **Thriller**: fill lights nearly off, the area light moved behind the
//!   objects and the point light's range flickering every 20 frames
//!
//! Runs natively (winit window) and in the browser (WebGL2, or WebGPU as a
//! fallback).

pub mod app;
pub mod debug_panel;
pub mod egui_integration;
pub mod lighting;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod window;

#[cfg(not(target_arch = "wasm32"))]
pub mod args;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::{DemoRuntime, LightingDemo};
pub use egui_integration::WgpuEguiIntegration;
pub use lighting::{LightingMode, LightingPreset, LightingState, RandomSource};
pub use renderer::{RenderError, RenderResult, Renderer};
pub use window::Viewport;

use glam::Vec3;
use thiserror::Error;

/// Errors that stop the demo from starting or running
#[derive(Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Configuration for the demo
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Linear RGB background
    pub clear_color: Vec3,
    /// Frames between point-light flickers in thriller mode
    pub blink_interval: u64,
    /// Mode applied before the first frame
    pub start_mode: LightingMode,
    /// Seed for the flicker; OS entropy when `None`
    pub seed: Option<u64>,
    /// Exit after this many frames
    pub max_frames: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Lighting Modes".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: Vec3::ZERO,
            blink_interval: lighting::BLINK_INTERVAL,
            start_mode: LightingMode::Calm,
            seed: None,
            max_frames: None,
        }
    }
}

// Web initialization helper
#[cfg(target_arch = "wasm32")]
pub fn init_web_logging() {
    console_error_panic_hook::set_once();
    // A second init (page re-entry) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.title, "Lighting Modes");
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(config.vsync);
        assert_eq!(config.blink_interval, 20);
        assert_eq!(config.start_mode, LightingMode::Calm);
        assert!(config.max_frames.is_none());
    }

    #[test]
    fn render_errors_convert() {
        let err: DemoError = RenderError::OutOfMemory.into();
        assert_eq!(err.to_string(), "Out of memory");
    }
}
