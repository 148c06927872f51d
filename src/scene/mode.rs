//! Render regime selection.

use std::fmt;

/// Mutually exclusive surface regimes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneMode {
    /// Gentle ripples from a continuously evolving wave bank
    #[default]
    Lake,
    /// Static field of large swells
    Ocean,
    /// Elastic sheet driven by drag gestures
    Trampoline,
}

impl SceneMode {
    pub const ALL: [SceneMode; 3] = [SceneMode::Lake, SceneMode::Ocean, SceneMode::Trampoline];
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneMode::Lake => "lake",
            SceneMode::Ocean => "ocean",
            SceneMode::Trampoline => "trampoline",
        };
        f.write_str(name)
    }
}

/// Active regime plus the solid-object overlay.
///
/// Every transition is legal. The overlay is independent of the regime:
/// toggling it never touches regime state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneModeController {
    mode: SceneMode,
    solid_object: bool,
}

impl SceneModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn is(&self, mode: SceneMode) -> bool {
        self.mode == mode
    }

    pub fn solid_object(&self) -> bool {
        self.solid_object
    }

    /// Switch regime; returns the previous one
    pub fn select(&mut self, mode: SceneMode) -> SceneMode {
        std::mem::replace(&mut self.mode, mode)
    }

    /// Flip the overlay; returns the new value
    pub fn toggle_solid_object(&mut self) -> bool {
        self.solid_object = !self.solid_object;
        self.solid_object
    }
}
