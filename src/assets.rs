//! Loading the shader sources and images named on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::SetupError;

/// WGSL sources for the two pipeline stages.
///
/// The vertex file must define `vs_main`, the fragment file `fs_main`.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex_path: PathBuf,
    pub vertex: String,
    pub fragment_path: PathBuf,
    pub fragment: String,
}

impl ShaderSources {
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self, SetupError> {
        Ok(Self {
            vertex: read_shader(vertex_path)?,
            vertex_path: vertex_path.to_path_buf(),
            fragment: read_shader(fragment_path)?,
            fragment_path: fragment_path.to_path_buf(),
        })
    }
}

fn read_shader(path: &Path) -> Result<String, SetupError> {
    let source = fs::read_to_string(path).map_err(|source| SetupError::Shader {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded shader {} ({} bytes)", path.display(), source.len());
    Ok(source)
}

/// Decode any supported image format to 8-bit RGBA
pub fn load_rgba(path: &Path) -> Result<RgbaImage, SetupError> {
    let image = image::open(path)
        .map_err(|source| SetupError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    log::info!(
        "Loaded image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Everything the renderer needs from disk
pub struct SceneAssets {
    pub shaders: ShaderSources,
    pub light_probe: RgbaImage,
    pub normal_map: RgbaImage,
}

impl SceneAssets {
    pub fn load(
        vertex_shader: &Path,
        fragment_shader: &Path,
        light_probe: &Path,
        normal_map: &Path,
    ) -> Result<Self, SetupError> {
        Ok(Self {
            shaders: ShaderSources::load(vertex_shader, fragment_shader)?,
            light_probe: load_rgba(light_probe)?,
            normal_map: load_rgba(normal_map)?,
        })
    }
}
