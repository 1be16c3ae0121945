//! Crate-level error type and `Result` alias.
//! The analyzer and rectangle algebra report their outcomes as data; these
//! variants cover the boundary checks (buffer geometry, regions, parameters)
//! and the I/O, JSON and decoding errors of the config and CLI layers.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid pixel buffer: {reason}")]
    InvalidBuffer { reason: String },

    #[error("Region {region} lies outside the {width}x{height} buffer")]
    RegionOutOfBounds {
        region: crate::types::Rect,
        width: usize,
        height: usize,
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    pub fn invalid_buffer<S: Into<String>>(reason: S) -> Self {
        Error::InvalidBuffer {
            reason: reason.into(),
        }
    }
}
