//! Demo application: scene setup, per-frame update and event handling
//!
//! [`LightingDemo`] is the platform-independent state (scene, lighting mode,
//! camera controls, panel). [`DemoRuntime`] adds the window, renderer and
//! egui integration and is driven by the winit event loop on both native and
//! web builds.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::EventLoopWindowTarget,
    window::Window,
};

use crate::debug_panel::DebugPanel;
use crate::egui_integration::WgpuEguiIntegration;
use crate::lighting::{flicker_rng, LightingMode, LightingState};
use crate::renderer::{RenderError, RenderResult, Renderer};
use crate::resources::{Mesh, StandardMaterial};
use crate::scene::{Camera, CameraInput, OrbitController, RenderObject, Scene, Transform};
use crate::window::Viewport;
use crate::DemoConfig;

/// Shared roughness of every mesh in the scene
pub const MATERIAL_ROUGHNESS: f32 = 0.4;

/// Angular velocity (radians per second) of the animated objects around X and Y
pub const SPIN_RATE: Vec2 = Vec2::new(0.15, 0.1);

/// Destination for mesh and material uploads
pub trait ResourceSink {
    fn add_mesh(&mut self, mesh: &Mesh) -> usize;
    fn add_material(&mut self, material: &StandardMaterial) -> usize;
}

impl ResourceSink for Renderer {
    fn add_mesh(&mut self, mesh: &Mesh) -> usize {
        Renderer::add_mesh(self, mesh)
    }

    fn add_material(&mut self, material: &StandardMaterial) -> usize {
        Renderer::add_material(self, material)
    }
}

/// Object ids of the demo meshes within [`Scene::objects`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub sphere: usize,
    pub cube: usize,
    pub torus: usize,
    pub plane: usize,
}

impl SceneHandles {
    /// Objects that spin every frame
    pub fn animated(&self) -> [usize; 3] {
        [self.sphere, self.cube, self.torus]
    }
}

/// Build the demo scene, uploading its meshes and material to `sink`
pub fn build_scene<S: ResourceSink + ?Sized>(
    sink: &mut S,
    config: &DemoConfig,
) -> (Scene, SceneHandles) {
    let material = sink.add_material(
        &StandardMaterial::new("standard").with_roughness(MATERIAL_ROUGHNESS),
    );

    let sphere_mesh = sink.add_mesh(&Mesh::sphere(0.5, 32, 32));
    let cube_mesh = sink.add_mesh(&Mesh::cuboid(0.75, 0.75, 0.75));
    let torus_mesh = sink.add_mesh(&Mesh::torus(0.3, 0.2, 32, 64));
    let plane_mesh = sink.add_mesh(&Mesh::plane(5.0, 5.0));

    let mut scene = Scene::new();
    scene.background = config.clear_color;
    scene.camera = Camera::new(Vec3::new(1.0, 1.0, 2.0), Vec3::ZERO);

    let handles = SceneHandles {
        sphere: scene.add_object(
            RenderObject::new(sphere_mesh, material).with_position(Vec3::new(-1.5, 0.0, 0.0)),
        ),
        cube: scene.add_object(RenderObject::new(cube_mesh, material)),
        torus: scene.add_object(
            RenderObject::new(torus_mesh, material).with_position(Vec3::new(1.5, 0.0, 0.0)),
        ),
        plane: scene.add_object(RenderObject::new(plane_mesh, material).with_transform(
            Transform::from_position(Vec3::new(0.0, -0.65, 0.0))
                .with_euler(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0)),
        )),
    };

    log::info!(
        "Scene ready: {} objects, {} lights",
        scene.objects.len(),
        scene.lights.light_count()
    );

    (scene, handles)
}

/// Platform-independent demo state
pub struct LightingDemo {
    pub scene: Scene,
    pub lighting: LightingState,
    handles: SceneHandles,
    rng: StdRng,
    orbit: OrbitController,
    input: CameraInput,
    cursor: Option<Vec2>,
    panel: DebugPanel,
    viewport: Viewport,
    frames: u64,
    max_frames: Option<u64>,
}

impl LightingDemo {
    pub fn new<S: ResourceSink + ?Sized>(
        sink: &mut S,
        config: &DemoConfig,
        viewport: Viewport,
    ) -> Self {
        let (mut scene, handles) = build_scene(sink, config);
        scene
            .camera
            .set_aspect(viewport.width as f32, viewport.height as f32);

        let mut lighting = LightingState::new().with_blink_interval(config.blink_interval);
        if config.start_mode != LightingMode::Calm {
            lighting.activate(config.start_mode, &mut scene.lights);
        }

        let orbit = OrbitController::new(scene.camera.target);

        Self {
            scene,
            lighting,
            handles,
            rng: flicker_rng(config.seed),
            orbit,
            input: CameraInput::new(),
            cursor: None,
            panel: DebugPanel::new(),
            viewport,
            frames: 0,
            max_frames: config.max_frames,
        }
    }

    pub fn handles(&self) -> SceneHandles {
        self.handles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames updated so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True once the configured frame limit has been reached
    pub fn finished(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frames >= max)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scene
            .camera
            .set_aspect(viewport.width as f32, viewport.height as f32);
    }

    /// Advance one frame; `elapsed` is seconds since the first frame.
    ///
    /// Order: lighting flicker, object spin, area light aim, camera controls.
    pub fn update(&mut self, elapsed: f32) {
        self.lighting.advance(&mut self.scene.lights, &mut self.rng);

        let euler = Vec3::new(SPIN_RATE.x * elapsed, SPIN_RATE.y * elapsed, 0.0);
        for id in self.handles.animated() {
            if let Some(object) = self.scene.object_mut(id) {
                object.transform.set_euler(euler);
            }
        }

        if let Some(cube) = self.scene.object(self.handles.cube) {
            let target = cube.transform.position;
            self.scene.lights.area.look_at(target);
        }

        self.orbit
            .handle_input(&self.scene.camera, &self.input, self.viewport.height as f32);
        self.orbit.update(&mut self.scene.camera);
        self.input.reset_deltas();

        self.frames += 1;
    }

    /// Draw the light panel; buttons switch the lighting mode immediately
    pub fn show_panel(&mut self, ctx: &egui::Context) {
        self.panel.show(ctx, &mut self.scene.lights, &mut self.lighting);
    }

    /// Feed pointer input to the orbit controls
    pub fn handle_pointer_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.rotate_active = pressed,
                    MouseButton::Right => self.input.pan_active = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let Some(last) = self.cursor {
                    if self.input.rotate_active || self.input.pan_active {
                        self.input.mouse_delta += position - last;
                    }
                }
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                self.input = CameraInput::new();
                self.cursor = None;
                self.orbit.reset();
            }
            _ => {}
        }
    }
}

/// Whether a window event reaches the orbit controls even when egui used it.
/// Releases and cursor tracking always pass so drags never get stuck.
fn always_forwarded(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::Focused(_)
            | WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
    )
}

/// Window, renderer, egui and demo state driven by the event loop
pub struct DemoRuntime {
    window: Arc<Window>,
    renderer: Renderer,
    egui: WgpuEguiIntegration,
    demo: LightingDemo,
    start_time: Option<f64>,
}

impl DemoRuntime {
    pub fn new(window: Arc<Window>, mut renderer: Renderer, config: &DemoConfig) -> Self {
        let egui = WgpuEguiIntegration::new(&renderer, &window);
        let demo = LightingDemo::new(&mut renderer, config, Viewport::from_window(&window));

        let mut runtime = Self {
            window,
            renderer,
            egui,
            demo,
            start_time: None,
        };
        let size = runtime.window.inner_size();
        runtime.resize(size);
        runtime
    }

    pub fn demo(&self) -> &LightingDemo {
        &self.demo
    }

    /// Handle one event loop event; `now` is a monotonic time in seconds
    pub fn handle_event(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>, now: f64) {
        match event {
            Event::WindowEvent { event, window_id } if window_id == self.window.id() => {
                self.handle_window_event(&event, elwt, now);
            }
            Event::AboutToWait => {
                self.window.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        elwt: &EventLoopWindowTarget<()>,
        now: f64,
    ) {
        let consumed = self.egui.on_window_event(&self.window, event);

        match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                self.resize(*size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let mut viewport = self.demo.viewport();
                viewport.scale_factor = *scale_factor;
                self.demo.resize(viewport);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.frame(now) {
                    log::error!("Render failed: {}", e);
                    if matches!(e, RenderError::OutOfMemory) {
                        elwt.exit();
                    }
                }
                if self.demo.finished() {
                    log::info!("Reached {} frames, exiting", self.demo.frames());
                    elwt.exit();
                }
            }
            _ => {
                if !consumed || always_forwarded(event) {
                    self.demo.handle_pointer_event(event);
                }
            }
        }
    }

    /// Track a new window size. Minimized windows keep the previous surface.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        let mut viewport = self.demo.viewport();
        viewport.resize(size);
        if viewport.is_empty() {
            return;
        }

        let (width, height) = viewport.surface_size();
        self.renderer.resize(width, height);
        let (surface_width, surface_height) = self.renderer.surface_size();
        self.egui.set_surface_scale(
            viewport.width,
            viewport.height,
            surface_width,
            surface_height,
        );

        self.demo.resize(viewport);
    }

    fn frame(&mut self, now: f64) -> RenderResult<()> {
        let start = *self.start_time.get_or_insert(now);
        self.demo.update((now - start) as f32);

        self.egui.begin_frame(&self.window);
        self.demo.show_panel(self.egui.context());
        self.egui.end_frame(&self.window);

        let egui = &mut self.egui;
        self.renderer
            .render(&self.demo.scene, |target| egui.paint(target))
    }
}

/// Run the demo in a native window until it is closed
#[cfg(not(target_arch = "wasm32"))]
pub fn run(config: DemoConfig) -> Result<(), crate::DemoError> {
    use winit::event_loop::{ControlFlow, EventLoop};

    let event_loop = EventLoop::new()?;
    let window = crate::window::create_window(&event_loop, &config)?;
    let renderer = Renderer::new(Arc::clone(&window), config.vsync)?;
    let mut runtime = DemoRuntime::new(window, renderer, &config);

    let clock = std::time::Instant::now();
    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        runtime.handle_event(event, elwt, clock.elapsed().as_secs_f64());
    })?;

    Ok(())
}
