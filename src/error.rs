//! Startup failures, which are fatal, and screenshot failures, which are not.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read shader {path}: {source}")]
    Shader {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("shader pipeline rejected: {0}")]
    Pipeline(String),

    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

/// Screenshot failures. Logged; the frame loop keeps running.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to map capture buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("capture buffer callback was dropped: {0}")]
    Dropped(#[from] std::sync::mpsc::RecvError),

    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
