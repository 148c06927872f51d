//! Orbit camera defaults and input sensitivities.

/// Orbit camera configuration
#[derive(Debug, Clone)]
pub struct CameraDefaults {
    /// Eye position restored by a camera reset (world units)
    pub translation: [f32; 3],

    /// Azimuth restored by a camera reset (degrees)
    pub azimuth_deg: f32,

    /// Elevation restored by a camera reset (degrees)
    /// 65° looks down onto the surface from above its near edge
    pub elevation_deg: f32,

    /// Orbit rate for left-button drags (degrees per pixel)
    pub rotate_sensitivity_deg_per_px: f32,

    /// Zoom rate for right-button drags (world units per pixel)
    pub zoom_sensitivity_per_px: f32,

    /// Translation applied per arrow-key press (world units)
    pub nudge_step: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            translation: [0.0, 1.0, 1.5],
            azimuth_deg: 0.0,
            elevation_deg: 65.0,
            rotate_sensitivity_deg_per_px: 0.5,
            zoom_sensitivity_per_px: 0.2,
            nudge_step: 0.2,
        }
    }
}
