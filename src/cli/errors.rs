use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid aspect ratio: {aspect}. Use a positive number or W:H (e.g. 16:9)")]
    InvalidAspect { aspect: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error(transparent)]
    Autocrop(#[from] autocrop::Error),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}
