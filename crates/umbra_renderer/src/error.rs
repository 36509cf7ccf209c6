//! Error type for camera setup, rendering and image output.

use thiserror::Error;

/// Errors surfaced by the renderer.
///
/// Numerical corner cases inside the tracer (misses, absorption, total
/// internal reflection, bounce exhaustion) are ordinary outcomes and never
/// show up here.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid camera configuration: {0}")]
    InvalidConfig(String),

    #[error("Camera must be initialized before rendering")]
    CameraNotInitialized,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

impl RenderError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
