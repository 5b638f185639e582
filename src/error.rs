use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconError {
    /// Bad size, missing or undecodable source image.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A drawing primitive rejected its bounds (degenerate radius, empty rect).
    #[error("drawing failed: {0}")]
    Draw(&'static str),

    #[error("cannot serialise batch report: {0}")]
    Report(#[from] serde_json::Error),
}

impl IconError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IconError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, IconError>;
