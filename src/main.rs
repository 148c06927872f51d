//! Ripplefield - interactive procedural surfaces
//!
//! A tessellated plane shaded as a rippling lake, an open ocean, or an
//! elastic trampoline that bounces back after being pulled.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key as WinitKey, NamedKey},
    window::{Window, WindowId},
};

use ripplefield::assets::SceneAssets;
use ripplefield::cli::Args;
use ripplefield::error::SetupError;
use ripplefield::input::{Command, Key, PointerButton, PointerEvent};
use ripplefield::mesh::{reference_solid, MeshData, SurfaceGrid};
use ripplefield::params::{CameraDefaults, LightingParams, RenderConfig, TickConfig};
use ripplefield::rendering::{DrawTarget, RenderSystem};
use ripplefield::scene::{Scene, SceneRequest};
use ripplefield::uniforms::SceneUniforms;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    assets: Option<SceneAssets>,
    surface_mesh: MeshData,
    solid_mesh: MeshData,
    uniforms: SceneUniforms,

    // Simulation
    scene: Scene,

    // Configuration
    render_config: RenderConfig,
    tick_config: TickConfig,
    lighting: LightingParams,

    // Input and timing
    cursor: (f32, f32),
    buttons_down: u32,
    screenshot_pending: bool,
    next_tick: Instant,

    setup_error: Option<SetupError>,
}

impl App {
    fn new(args: &Args, assets: SceneAssets) -> Self {
        let render_config = args.render_config();
        let tick_config = TickConfig::default();

        let grid = SurfaceGrid::new(render_config.tessellation_x, render_config.tessellation_z);
        let surface_mesh = grid.triangulate();
        let solid_mesh = reference_solid(render_config.solid_stacks, render_config.solid_slices);
        log::info!(
            "Surface: {} quads, {} vertices",
            grid.quad_count(),
            surface_mesh.vertices.len()
        );

        let scene = Scene::with_seed(args.seed, CameraDefaults::default(), tick_config.clone());

        Self {
            window: None,
            render_system: None,
            assets: Some(assets),
            surface_mesh,
            solid_mesh,
            uniforms: SceneUniforms::default(),
            scene,
            render_config,
            tick_config,
            lighting: LightingParams::default(),
            cursor: (0.0, 0.0),
            buttons_down: 0,
            screenshot_pending: false,
            next_tick: Instant::now(),
            setup_error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let window_attributes = Window::default_attributes()
            .with_title("Ripplefield")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let Some(assets) = self.assets.take() else {
            return Ok(());
        };
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &assets,
            &self.surface_mesh,
            &self.solid_mesh,
            &self.render_config,
        ))?;

        let (width, height) = render_system.size();
        self.render_config.window_width = width;
        self.render_config.window_height = height;

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: &WinitKey) {
        let key = match key {
            WinitKey::Named(NamedKey::Escape) => {
                event_loop.exit();
                return;
            }
            WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
            WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
            WinitKey::Named(NamedKey::ArrowUp) => Key::ArrowUp,
            WinitKey::Named(NamedKey::ArrowDown) => Key::ArrowDown,
            WinitKey::Character(text) => match text.chars().next() {
                Some(c) => Key::Char(c),
                None => return,
            },
            _ => return,
        };

        let nudge_step = self.scene.camera().defaults().nudge_step;
        let Some(command) = Command::from_key(key, nudge_step) else {
            return;
        };

        match self.scene.apply(command) {
            Some(SceneRequest::Screenshot) => self.screenshot_pending = true,
            Some(SceneRequest::Quit) => event_loop.exit(),
            None => {}
        }
        self.request_redraw();
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        let button = match button {
            MouseButton::Left => PointerButton::Left,
            MouseButton::Right => PointerButton::Right,
            _ => PointerButton::Other,
        };
        let (x, y) = self.cursor;

        let event = match state {
            ElementState::Pressed => {
                self.buttons_down += 1;
                PointerEvent::Pressed { button, x, y }
            }
            ElementState::Released => {
                self.buttons_down = self.buttons_down.saturating_sub(1);
                PointerEvent::Released { button, x, y }
            }
        };
        self.scene.handle_pointer(event);
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        self.cursor = (x, y);
        // Only drags move the camera or the trampoline
        if self.buttons_down > 0 {
            self.scene.handle_pointer(PointerEvent::Moved { x, y });
            self.request_redraw();
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let camera = self.scene.camera();
        let view = camera.view_transform();
        self.uniforms
            .set_camera(view, camera.projection(&self.render_config));
        self.uniforms.set_lighting(&self.lighting, view);
        self.scene.publish(&mut self.uniforms);
        render_system.update_uniforms(&self.uniforms);

        let target = if self.scene.draws_surface() {
            DrawTarget::Surface
        } else {
            DrawTarget::ReferenceSolid
        };
        let capture_path = self
            .screenshot_pending
            .then(|| PathBuf::from(&self.render_config.screenshot_path));

        match render_system.render(target, capture_path.as_deref()) {
            Ok(()) => self.screenshot_pending = false,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Setup failed: {}", e);
            self.setup_error = Some(e);
            event_loop.exit();
            return;
        }

        log::info!("Keys: 1 lake, 2 ocean, 3 trampoline, t solid, r reset camera, s screenshot, q quit");
        log::info!("Mouse: left drag orbits (pulls the trampoline in mode 3), right drag zooms");
        self.next_tick = Instant::now() + self.tick_config.period;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, &logical_key),
            WindowEvent::MouseInput { state, button, .. } => self.handle_mouse_button(state, button),
            WindowEvent::CursorMoved { position, .. } => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let (x, y) = logical_cursor(position, scale_factor);
                self.handle_cursor(x, y)
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                    let (width, height) = render_system.size();
                    self.render_config.window_width = width;
                    self.render_config.window_height = height;
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        // At most one simulation step per timer firing; a late timer does not catch up
        let now = Instant::now();
        if now >= self.next_tick {
            self.scene.tick();
            self.next_tick = now + self.tick_config.period;
            self.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

/// Pointer deltas are measured in logical pixels so drag speed and bounce
/// strength do not depend on the display's scale factor
fn logical_cursor(position: PhysicalPosition<f64>, scale_factor: f64) -> (f32, f32) {
    let logical = position.to_logical::<f32>(scale_factor);
    (logical.x, logical.y)
}

fn main() -> Result<(), SetupError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let assets = SceneAssets::load(
        &args.vertex_shader,
        &args.fragment_shader,
        &args.light_probe,
        &args.normal_map,
    )?;

    let mut app = App::new(&args, assets);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.setup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
