//! Named parameters published to the shading stage and their GPU layout.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::params::LightingParams;
use crate::waves::{WaveParams, WAVE_COUNT};

/// 0/1 flags telling the shaders which regime is active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeFlag {
    Lake,
    Ocean,
    Trampoline,
    /// Set when the reference solid replaces the surface
    Teapot,
}

/// Field of a `waves[i]` entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveField {
    Amplitude,
    Wavelength,
    Speed,
    DirectionX,
    DirectionY,
}

impl WaveField {
    pub const ALL: [WaveField; 5] = [
        WaveField::Amplitude,
        WaveField::Wavelength,
        WaveField::Speed,
        WaveField::DirectionX,
        WaveField::DirectionY,
    ];

    fn pick(self, params: &WaveParams) -> f32 {
        match self {
            WaveField::Amplitude => params.amplitude,
            WaveField::Wavelength => params.wavelength,
            WaveField::Speed => params.speed,
            WaveField::DirectionX => params.direction_x,
            WaveField::DirectionY => params.direction_y,
        }
    }
}

/// Texture samplers and the units they are bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    NormalMap,
    EnvironmentMap,
}

impl TextureSlot {
    pub fn name(self) -> &'static str {
        match self {
            TextureSlot::NormalMap => "normalTex",
            TextureSlot::EnvironmentMap => "envMapTex",
        }
    }

    pub fn unit(self) -> u32 {
        match self {
            TextureSlot::NormalMap => 0,
            TextureSlot::EnvironmentMap => 1,
        }
    }
}

/// Address of a scalar parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamPath {
    /// Simulation clock
    Time,
    Flag(ModeFlag),
    Wave { index: usize, field: WaveField },
    /// One-shot trampoline impulse
    Bounce,
}

impl fmt::Display for ParamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamPath::Time => f.write_str("t"),
            ParamPath::Flag(ModeFlag::Lake) => f.write_str("lake"),
            ParamPath::Flag(ModeFlag::Ocean) => f.write_str("ocean"),
            ParamPath::Flag(ModeFlag::Trampoline) => f.write_str("trampoline"),
            ParamPath::Flag(ModeFlag::Teapot) => f.write_str("teapot"),
            ParamPath::Wave { index, field } => {
                let suffix = match field {
                    WaveField::Amplitude => "A",
                    WaveField::Wavelength => "L",
                    WaveField::Speed => "S",
                    WaveField::DirectionX => "x",
                    WaveField::DirectionY => "y",
                };
                write!(f, "waves[{}].{}", index, suffix)
            }
            ParamPath::Bounce => f.write_str("bounce"),
        }
    }
}

/// Destination for per-frame shader parameters
pub trait UniformSink {
    fn set_scalar(&mut self, path: ParamPath, value: f32);

    fn set_texture(&mut self, slot: TextureSlot, unit: u32);

    fn set_flag(&mut self, flag: ModeFlag, on: bool) {
        self.set_scalar(ParamPath::Flag(flag), if on { 1.0 } else { 0.0 });
    }

    fn set_wave(&mut self, index: usize, params: &WaveParams) {
        for field in WaveField::ALL {
            self.set_scalar(ParamPath::Wave { index, field }, field.pick(params));
        }
    }
}

/// One `waves[i]` entry, padded to a 16-byte array stride
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveUniform {
    pub amplitude: f32,
    pub wavelength: f32,
    pub speed: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub _padding: [f32; 3],
}

/// Light and material in the form the shaders read them.
///
/// The light position is in eye space, matching what a fixed-function
/// light set after the view transform would report.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub material_ambient: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub shininess: f32,
    pub _padding: [f32; 3],
}

impl LightingUniform {
    pub fn new(params: &LightingParams, view: Mat4) -> Self {
        let eye_position = view * Vec4::from_array(params.light_position);
        Self {
            light_position: eye_position.to_array(),
            light_ambient: params.light_ambient,
            light_diffuse: params.light_diffuse,
            light_specular: params.light_specular,
            material_ambient: params.material_ambient,
            material_diffuse: params.material_diffuse,
            material_specular: params.material_specular,
            shininess: params.shininess,
            _padding: [0.0; 3],
        }
    }
}

/// Uniform block bound at group 0, binding 0 of the user's shaders.
///
/// Matching WGSL:
/// ```text
/// struct Wave { A: f32, L: f32, S: f32, x: f32, y: f32, _p0: f32, _p1: f32, _p2: f32 }
/// struct Lighting {
///     light_position: vec4<f32>,   // eye space
///     light_ambient: vec4<f32>, light_diffuse: vec4<f32>, light_specular: vec4<f32>,
///     material_ambient: vec4<f32>, material_diffuse: vec4<f32>, material_specular: vec4<f32>,
///     shininess: f32, _p0: f32, _p1: f32, _p2: f32,
/// }
/// struct Scene {
///     view_proj: mat4x4<f32>,
///     view: mat4x4<f32>,           // world (= model) to eye
///     normal_matrix: mat4x4<f32>,  // inverse transpose of view
///     t: f32, lake: f32, ocean: f32, trampoline: f32,
///     teapot: f32, bounce: f32, normalTex: u32, envMapTex: u32,
///     lighting: Lighting,
///     waves: array<Wave, 10>,
/// }
/// ```
/// Values persist between frames, so a parameter that is not published
/// keeps whatever it was last set to.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub t: f32,
    pub lake: f32,
    pub ocean: f32,
    pub trampoline: f32,
    pub teapot: f32,
    pub bounce: f32,
    pub normal_tex: u32,
    pub env_map_tex: u32,
    pub lighting: LightingUniform,
    pub waves: [WaveUniform; WAVE_COUNT],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            lighting: LightingUniform::new(&LightingParams::default(), Mat4::IDENTITY),
            ..Self::zeroed()
        }
    }
}

impl SceneUniforms {
    /// Set the camera matrices; the surface sits at the world origin
    pub fn set_camera(&mut self, view: Mat4, projection: Mat4) {
        self.view_proj = (projection * view).to_cols_array_2d();
        self.view = view.to_cols_array_2d();
        self.normal_matrix = view.inverse().transpose().to_cols_array_2d();
    }

    /// Light and material, with the light moved into eye space by `view`
    pub fn set_lighting(&mut self, params: &LightingParams, view: Mat4) {
        self.lighting = LightingUniform::new(params, view);
    }
}

impl UniformSink for SceneUniforms {
    fn set_scalar(&mut self, path: ParamPath, value: f32) {
        match path {
            ParamPath::Time => self.t = value,
            ParamPath::Flag(ModeFlag::Lake) => self.lake = value,
            ParamPath::Flag(ModeFlag::Ocean) => self.ocean = value,
            ParamPath::Flag(ModeFlag::Trampoline) => self.trampoline = value,
            ParamPath::Flag(ModeFlag::Teapot) => self.teapot = value,
            ParamPath::Bounce => self.bounce = value,
            ParamPath::Wave { index, field } => {
                let Some(wave) = self.waves.get_mut(index) else {
                    log::warn!("Ignoring out-of-range parameter {}", path);
                    return;
                };
                let slot = match field {
                    WaveField::Amplitude => &mut wave.amplitude,
                    WaveField::Wavelength => &mut wave.wavelength,
                    WaveField::Speed => &mut wave.speed,
                    WaveField::DirectionX => &mut wave.direction_x,
                    WaveField::DirectionY => &mut wave.direction_y,
                };
                *slot = value;
            }
        }
    }

    fn set_texture(&mut self, slot: TextureSlot, unit: u32) {
        match slot {
            TextureSlot::NormalMap => self.normal_tex = unit,
            TextureSlot::EnvironmentMap => self.env_map_tex = unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_names_match_shader_identifiers() {
        assert_eq!(ParamPath::Time.to_string(), "t");
        assert_eq!(ParamPath::Flag(ModeFlag::Teapot).to_string(), "teapot");
        assert_eq!(ParamPath::Bounce.to_string(), "bounce");
        assert_eq!(
            ParamPath::Wave {
                index: 7,
                field: WaveField::Wavelength
            }
            .to_string(),
            "waves[7].L"
        );
        assert_eq!(TextureSlot::NormalMap.name(), "normalTex");
        assert_eq!(TextureSlot::EnvironmentMap.unit(), 1);
    }

    #[test]
    fn test_uniform_block_layout() {
        use std::mem::{offset_of, size_of};

        assert_eq!(size_of::<WaveUniform>(), 32);
        assert_eq!(size_of::<LightingUniform>(), 128);

        assert_eq!(offset_of!(SceneUniforms, view), 64);
        assert_eq!(offset_of!(SceneUniforms, normal_matrix), 128);
        assert_eq!(offset_of!(SceneUniforms, t), 192);
        assert_eq!(offset_of!(SceneUniforms, lighting), 224);
        assert_eq!(offset_of!(SceneUniforms, waves), 352);
        assert_eq!(offset_of!(LightingUniform, shininess), 112);
        assert_eq!(size_of::<SceneUniforms>(), 352 + 32 * WAVE_COUNT);

        // Struct members of a WGSL uniform block start on 16-byte boundaries
        assert_eq!(offset_of!(SceneUniforms, lighting) % 16, 0);
        assert_eq!(offset_of!(SceneUniforms, waves) % 16, 0);
    }

    #[test]
    fn test_lighting_defaults_reach_the_block() {
        let uniforms = SceneUniforms::default();
        let lighting = uniforms.lighting;
        assert_eq!(lighting.light_position, [4.0, 10.0, 4.0, 1.0]);
        assert_eq!(lighting.light_ambient, [0.1, 0.1, 0.1, 1.0]);
        assert_eq!(lighting.material_diffuse, [0.1, 0.2, 0.6, 1.0]);
        assert_eq!(lighting.material_specular, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(lighting.shininess, 8.0);
    }

    #[test]
    fn test_light_position_is_moved_into_eye_space() {
        let mut uniforms = SceneUniforms::default();
        let view = Mat4::from_translation(glam::Vec3::new(0.0, -1.0, -1.5));

        uniforms.set_lighting(&LightingParams::default(), view);

        assert_eq!(uniforms.lighting.light_position, [4.0, 9.0, 2.5, 1.0]);
        assert_eq!(uniforms.lighting.shininess, 8.0);
    }

    #[test]
    fn test_camera_matrices() {
        let mut uniforms = SceneUniforms::default();
        let view = Mat4::from_rotation_y(0.5);
        let projection = Mat4::perspective_rh(0.5, 1.5, 0.1, 100.0);

        uniforms.set_camera(view, projection);

        assert_eq!(uniforms.view, view.to_cols_array_2d());
        assert_eq!(uniforms.view_proj, (projection * view).to_cols_array_2d());
        // A pure rotation is its own inverse transpose
        let normal = Mat4::from_cols_array_2d(&uniforms.normal_matrix);
        assert!(normal.abs_diff_eq(view, 1e-6));
    }

    #[test]
    fn test_set_wave_fills_every_field() {
        let mut uniforms = SceneUniforms::default();
        let params = WaveParams {
            amplitude: 0.05,
            wavelength: 0.25,
            speed: 0.35,
            direction_x: -0.5,
            direction_y: 0.75,
        };

        uniforms.set_wave(3, &params);

        let wave = uniforms.waves[3];
        assert_eq!(wave.amplitude, 0.05);
        assert_eq!(wave.wavelength, 0.25);
        assert_eq!(wave.speed, 0.35);
        assert_eq!(wave.direction_x, -0.5);
        assert_eq!(wave.direction_y, 0.75);
        assert_eq!(uniforms.waves[2], WaveUniform::default());
    }

    #[test]
    fn test_out_of_range_wave_is_ignored() {
        let mut uniforms = SceneUniforms::default();
        let before = uniforms;
        uniforms.set_scalar(
            ParamPath::Wave {
                index: WAVE_COUNT,
                field: WaveField::Amplitude,
            },
            1.0,
        );
        assert_eq!(uniforms, before);
    }

    #[test]
    fn test_flags_and_textures() {
        let mut uniforms = SceneUniforms::default();
        uniforms.set_flag(ModeFlag::Ocean, true);
        uniforms.set_texture(TextureSlot::EnvironmentMap, 1);

        assert_eq!(uniforms.ocean, 1.0);
        assert_eq!(uniforms.lake, 0.0);
        assert_eq!(uniforms.env_map_tex, 1);
    }
}
