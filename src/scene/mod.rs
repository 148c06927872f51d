//! Owned scene state: regimes, waves, camera, gestures and the clock.
//!
//! Input handlers, the fixed-rate tick and the render pass all go through
//! [`Scene`] on one thread, so every mutation is visible to the next call.

mod clock;
mod mode;

pub use clock::SimulationClock;
pub use mode::{SceneMode, SceneModeController};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::CameraRig;
use crate::gesture::DragGesture;
use crate::input::{Command, PointerButton, PointerEvent, PointerTracker};
use crate::params::{CameraDefaults, TickConfig};
use crate::uniforms::{ModeFlag, ParamPath, TextureSlot, UniformSink};
use crate::waves::WaveBank;

/// Commands the scene cannot carry out itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    Screenshot,
    Quit,
}

/// Complete interactive state of the surface simulation
pub struct Scene<R: Rng = StdRng> {
    lake_waves: WaveBank<R>,
    ocean_waves: WaveBank<R>,
    camera: CameraRig,
    drag: DragGesture,
    pointer: PointerTracker,
    modes: SceneModeController,
    clock: SimulationClock,
    tick_config: TickConfig,
}

impl Scene<StdRng> {
    /// Build a scene whose waves are reproducible when `seed` is given
    pub fn with_seed(seed: Option<u64>, camera: CameraDefaults, tick_config: TickConfig) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng, camera, tick_config)
    }
}

impl<R: Rng + SeedableRng> Scene<R> {
    /// Start in Lake with fresh lake waves and a one-time ocean field
    pub fn new(mut rng: R, camera: CameraDefaults, tick_config: TickConfig) -> Self {
        let ocean_rng = R::seed_from_u64(rng.gen());
        Self {
            lake_waves: WaveBank::lake(rng),
            ocean_waves: WaveBank::ocean(ocean_rng),
            camera: CameraRig::new(camera),
            drag: DragGesture::new(),
            pointer: PointerTracker::default(),
            modes: SceneModeController::new(),
            clock: SimulationClock::new(),
            tick_config,
        }
    }
}

impl<R: Rng> Scene<R> {
    pub fn mode(&self) -> SceneMode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &SceneModeController {
        &self.modes
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn drag(&self) -> &DragGesture {
        &self.drag
    }

    pub fn lake_waves(&self) -> &WaveBank<R> {
        &self.lake_waves
    }

    pub fn ocean_waves(&self) -> &WaveBank<R> {
        &self.ocean_waves
    }

    /// Whether the generated surface (rather than the reference solid) is drawn
    pub fn draws_surface(&self) -> bool {
        !self.modes.solid_object()
    }

    /// One fixed-rate timer firing
    pub fn tick(&mut self) {
        match self.modes.mode() {
            SceneMode::Lake => {
                let resampled = self.lake_waves.advance();
                if resampled > 0 {
                    log::trace!("{} lake waves resampled", resampled);
                }
                self.clock.advance(self.tick_config.clock_increment);
            }
            SceneMode::Trampoline if !self.drag.is_active() => {
                self.clock.advance(self.tick_config.clock_increment);
            }
            SceneMode::Trampoline | SceneMode::Ocean => {}
        }
    }

    /// Enter a regime, resetting the clock.
    ///
    /// Lake draws a new wave bank; Ocean keeps its startup field.
    pub fn select_mode(&mut self, mode: SceneMode) {
        let previous = self.modes.select(mode);
        self.clock.reset();
        if self.drag.is_active() {
            self.drag.cancel();
        }
        if mode == SceneMode::Lake {
            self.lake_waves.initialize_lake();
        }
        log::info!("Mode: {} -> {}", previous, mode);
    }

    pub fn toggle_solid_object(&mut self) {
        let on = self.modes.toggle_solid_object();
        log::info!("Reference solid {}", if on { "shown" } else { "hidden" });
    }

    /// Apply a keyboard command
    pub fn apply(&mut self, command: Command) -> Option<SceneRequest> {
        match command {
            Command::SelectMode(mode) => self.select_mode(mode),
            Command::ToggleSolidObject => self.toggle_solid_object(),
            Command::ResetCamera => {
                self.camera.reset();
                log::info!("Camera reset");
            }
            Command::Nudge(delta) => self.camera.translate(delta),
            Command::Screenshot => return Some(SceneRequest::Screenshot),
            Command::Quit => return Some(SceneRequest::Quit),
        }
        None
    }

    /// Route a pointer event to the trampoline gesture or the camera
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let trampoline = self.modes.is(SceneMode::Trampoline);

        match event {
            PointerEvent::Pressed {
                button: PointerButton::Left,
                x,
                y,
            } if trampoline => self.drag.begin(x, y),
            PointerEvent::Released {
                button: PointerButton::Left,
                ..
            } if trampoline => {
                if let Some(length) = self.drag.end() {
                    self.clock.reset();
                    log::info!("Trampoline released after {:.1}px drag", length);
                }
            }
            PointerEvent::Pressed { button, .. } => self.pointer.press(button),
            PointerEvent::Released { .. } => self.pointer.release(),
            PointerEvent::Moved { x, y } => {
                if self.drag.is_active() {
                    self.drag.update(x, y);
                    return;
                }
                let Some(delta) = self.pointer.motion(x, y) else {
                    return;
                };
                let defaults = self.camera.defaults();
                let rotate = defaults.rotate_sensitivity_deg_per_px;
                let zoom = defaults.zoom_sensitivity_per_px;
                match self.pointer.button() {
                    Some(PointerButton::Left) => {
                        self.camera.rotate(-delta.x * rotate, -delta.y * rotate)
                    }
                    Some(PointerButton::Right) => {
                        self.camera.translate(Vec3::new(0.0, 0.0, delta.x * zoom))
                    }
                    _ => {}
                }
            }
        }
    }

    /// Push this frame's parameters to the shading stage.
    ///
    /// Consumes a pending trampoline bounce, so it is published once.
    pub fn publish<S: UniformSink>(&mut self, sink: &mut S) {
        for slot in [TextureSlot::NormalMap, TextureSlot::EnvironmentMap] {
            sink.set_texture(slot, slot.unit());
        }

        if self.modes.solid_object() {
            sink.set_flag(ModeFlag::Teapot, true);
            return;
        }

        let mode = self.modes.mode();
        sink.set_flag(ModeFlag::Teapot, false);
        sink.set_scalar(ParamPath::Time, self.clock.t());
        sink.set_flag(ModeFlag::Lake, mode == SceneMode::Lake);
        sink.set_flag(ModeFlag::Ocean, mode == SceneMode::Ocean);
        sink.set_flag(ModeFlag::Trampoline, mode == SceneMode::Trampoline);

        match mode {
            SceneMode::Lake => publish_waves(&self.lake_waves, sink),
            SceneMode::Ocean => publish_waves(&self.ocean_waves, sink),
            SceneMode::Trampoline => {
                if let Some(length) = self.drag.take_bounce() {
                    sink.set_scalar(ParamPath::Bounce, length / self.tick_config.bounce_divisor);
                }
            }
        }
    }
}

fn publish_waves<R: Rng, S: UniformSink>(bank: &WaveBank<R>, sink: &mut S) {
    for (index, params) in bank.params() {
        sink.set_wave(index, &params);
    }
}
