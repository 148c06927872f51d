//! Orbit camera driven by pointer drags and arrow-key nudges.

use glam::{Mat4, Vec3};

use crate::params::{CameraDefaults, RenderConfig};

/// Spherical camera pose.
///
/// Angles accumulate without wrapping; every consumer goes through
/// trigonometric functions, which are periodic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub translation: Vec3,
}

impl CameraState {
    pub fn from_defaults(defaults: &CameraDefaults) -> Self {
        Self {
            azimuth_deg: defaults.azimuth_deg,
            elevation_deg: defaults.elevation_deg,
            translation: Vec3::from_array(defaults.translation),
        }
    }
}

/// Camera with its reset pose and input sensitivities
pub struct CameraRig {
    state: CameraState,
    defaults: CameraDefaults,
}

impl CameraRig {
    pub fn new(defaults: CameraDefaults) -> Self {
        Self {
            state: CameraState::from_defaults(&defaults),
            defaults,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn defaults(&self) -> &CameraDefaults {
        &self.defaults
    }

    /// Restore the default eye position and orientation
    pub fn reset(&mut self) {
        self.state = CameraState::from_defaults(&self.defaults);
    }

    /// Add to azimuth and elevation (degrees)
    pub fn rotate(&mut self, delta_azimuth_deg: f32, delta_elevation_deg: f32) {
        self.state.azimuth_deg += delta_azimuth_deg;
        self.state.elevation_deg += delta_elevation_deg;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.state.translation += delta;
    }

    /// World-to-eye transform.
    ///
    /// Applied to a world point right to left: mirror Y and tip the
    /// surface's +Z depth axis so it faces the camera, spin by azimuth
    /// about Y, tilt by elevation about X, then pull back by the
    /// camera translation. Changing the order moves the orbit centre.
    pub fn view_transform(&self) -> Mat4 {
        let s = &self.state;
        Mat4::from_translation(-s.translation)
            * Mat4::from_rotation_x((-s.elevation_deg).to_radians())
            * Mat4::from_rotation_y((-s.azimuth_deg).to_radians())
            * Mat4::from_rotation_x((-90.0f32).to_radians())
            * Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))
    }

    /// Eye-to-clip perspective projection
    pub fn projection(&self, render_config: &RenderConfig) -> Mat4 {
        Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        )
    }

    /// [`Self::projection`] times [`Self::view_transform`]
    pub fn view_proj(&self, render_config: &RenderConfig) -> Mat4 {
        self.projection(render_config) * self.view_transform()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(CameraDefaults::default())
    }

    #[test]
    fn test_zero_deltas_leave_transform_unchanged() {
        let mut camera = rig();
        camera.reset();
        let reference = camera.view_transform();

        camera.rotate(0.0, 0.0);
        camera.translate(Vec3::ZERO);

        assert_eq!(camera.view_transform(), reference);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut camera = rig();
        camera.rotate(30.0, -10.0);
        camera.translate(Vec3::new(1.0, 2.0, 3.0));
        camera.reset();

        let state = camera.state();
        assert_eq!(state.azimuth_deg, 0.0);
        assert_eq!(state.elevation_deg, 65.0);
        assert_eq!(state.translation, Vec3::new(0.0, 1.0, 1.5));
    }

    #[test]
    fn test_world_origin_sits_behind_translation() {
        let camera = rig();
        let eye = camera.view_transform().transform_point3(Vec3::ZERO);
        assert!(eye.abs_diff_eq(Vec3::new(0.0, -1.0, -1.5), 1e-6));
    }

    #[test]
    fn test_surface_normal_faces_camera_at_default_pose() {
        // With 65° elevation the +Y surface normal should point mostly at the viewer (+Z eye)
        let camera = rig();
        let normal = camera.view_transform().transform_vector3(Vec3::Y);
        assert!(normal.z > 0.0, "normal = {:?}", normal);
    }

    #[test]
    fn test_angles_accumulate_without_wrapping() {
        let mut camera = rig();
        camera.rotate(400.0, 0.0);
        assert_eq!(camera.state().azimuth_deg, 400.0);

        let mut wrapped = rig();
        wrapped.rotate(40.0, 0.0);

        assert!(camera
            .view_transform()
            .abs_diff_eq(wrapped.view_transform(), 1e-5));
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = rig();
        let view_proj = camera.view_proj(&RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(view_proj.is_finite());
    }
}
