//! Point light and surface material handed to the shaders.

/// Phong light and material configuration
#[derive(Debug, Clone)]
pub struct LightingParams {
    /// Light position (world units, w = 1 for a point light)
    /// Sits above and to the right of the far edge of the surface
    pub light_position: [f32; 4],

    /// Light ambient colour (RGBA, 0..1)
    pub light_ambient: [f32; 4],

    /// Light diffuse colour (RGBA, 0..1)
    pub light_diffuse: [f32; 4],

    /// Light specular colour (RGBA, 0..1)
    pub light_specular: [f32; 4],

    /// Material ambient reflectance (RGBA, 0..1)
    pub material_ambient: [f32; 4],

    /// Material diffuse reflectance (RGBA, 0..1)
    /// Deep blue water tint
    pub material_diffuse: [f32; 4],

    /// Material specular reflectance (RGBA, 0..1)
    pub material_specular: [f32; 4],

    /// Specular exponent (1..128)
    pub shininess: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            light_position: [4.0, 10.0, 4.0, 1.0],
            light_ambient: [0.1, 0.1, 0.1, 1.0],
            light_diffuse: [1.0, 1.0, 1.0, 1.0],
            light_specular: [1.0, 1.0, 1.0, 1.0],
            material_ambient: [0.1, 0.2, 0.6, 1.0],
            material_diffuse: [0.1, 0.2, 0.6, 1.0],
            material_specular: [0.8, 0.8, 0.8, 1.0],
            shininess: 8.0,
        }
    }
}
