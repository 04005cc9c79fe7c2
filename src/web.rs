//! Browser entry point
//!
//! Creates a canvas-backed window that fills the page, initializes the renderer
//! (WebGL2, falling back to WebGPU) and hands the event loop to the browser.
//! The canvas follows the page through CSS, so browser resizes arrive as
//! `WindowEvent::Resized`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::prelude::*;
use winit::{
    dpi::LogicalSize,
    event_loop::{ControlFlow, EventLoop},
    platform::web::{EventLoopExtWebSys, WindowBuilderExtWebSys, WindowExtWebSys},
    window::{Window, WindowBuilder},
};

use crate::{init_web_logging, DemoConfig, DemoError, DemoRuntime, Renderer};

/// Page size in CSS pixels
fn page_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Let the canvas fill the page instead of keeping its creation size
fn fill_page(window: &Window) {
    let Some(canvas) = window.canvas() else {
        log::warn!("Window has no canvas, keeping its initial size");
        return;
    };

    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        let _ = body.style().set_property("margin", "0");
        let _ = body.style().set_property("overflow", "hidden");
    }

    let style = canvas.style();
    for (name, value) in [("display", "block"), ("width", "100vw"), ("height", "100vh")] {
        if style.set_property(name, value).is_err() {
            log::warn!("Failed to set canvas {}", name);
        }
    }
}

fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Called automatically by wasm-bindgen when the module loads
#[wasm_bindgen(start)]
pub fn start() {
    init_web_logging();
    log::info!("=== Lighting Modes ===");

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            log::error!("Demo failed to start: {}", e);
        }
    });
}

async fn run() -> Result<(), DemoError> {
    let mut config = DemoConfig::default();
    if let Some((css_width, css_height)) = page_size() {
        config.width = css_width as u32;
        config.height = css_height as u32;
    }
    log::info!("Page size: {}x{} CSS px", config.width, config.height);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_append(true)
            .build(&event_loop)?,
    );
    fill_page(&window);

    let renderer = Renderer::new_async(Arc::clone(&window), config.vsync).await?;
    let runtime = Rc::new(RefCell::new(DemoRuntime::new(window, renderer, &config)));

    log::info!("Starting render loop...");
    event_loop.spawn(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        runtime
            .borrow_mut()
            .handle_event(event, elwt, now_seconds());
    });

    Ok(())
}
