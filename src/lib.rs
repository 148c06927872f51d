//! Ripplefield library - procedural lake, ocean and trampoline surfaces

pub mod assets;
pub mod camera;
pub mod cli;
pub mod error;
pub mod gesture;
pub mod input;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod uniforms;
pub mod waves;
