use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },

    #[error("Surface acquisition failed: {0}")]
    SurfaceAcquisition(#[from] SurfaceError),

    #[error("Presentation failed: {0}")]
    Present(SurfaceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn image_load(path: &Path, reason: impl ToString) -> Self {
        AppError::ImageLoad {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Display unavailable: {0}")]
    Unavailable(String),

    #[error("Surface not supported in this build: {0}")]
    Unsupported(&'static str),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
