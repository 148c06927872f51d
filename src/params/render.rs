//! Rendering, timing, and capture configuration.

use std::time::Duration;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Background grey level (0..1)
    pub clear_grey: f64,

    /// Surface quads along X
    pub tessellation_x: u32,

    /// Surface quads along Z
    pub tessellation_z: u32,

    /// Latitude bands of the reference solid
    pub solid_stacks: u32,

    /// Longitude segments of the reference solid
    pub solid_slices: u32,

    /// Where the `s` key writes the captured frame
    pub screenshot_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 640,
            window_height: 480,
            fov_degrees: 30.0,
            near_plane: 0.1,
            far_plane: 100.0,
            clear_grey: 0.1,
            tessellation_x: 400,
            tessellation_z: 400,
            solid_stacks: 32,
            solid_slices: 64,
            screenshot_path: "screenshot.png".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Fixed-rate simulation timing
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Timer period between simulation ticks
    pub period: Duration,

    /// Amount the simulation clock advances per tick (clock units)
    pub clock_increment: f32,

    /// Drag length (pixels) is divided by this to get the bounce magnitude
    pub bounce_divisor: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(10),
            clock_increment: 0.1,
            bounce_divisor: 300.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_survives_zero_height() {
        let config = RenderConfig {
            window_height: 0,
            ..RenderConfig::default()
        };
        assert!(config.aspect_ratio().is_finite());
        assert_eq!(RenderConfig::default().aspect_ratio(), 640.0 / 480.0);
    }
}
