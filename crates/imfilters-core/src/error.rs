//! Error type shared by every filter, the engine, and image I/O.

use std::path::PathBuf;

/// Errors returned by filters, composite pipelines, and image I/O.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported image format for {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid value {value:?} for {name}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("channel value {value} at ({x}, {y}) is outside 0..=255")]
    ArithmeticOverflow { x: u32, y: u32, value: i64 },
    #[error("failed to launch image viewer: {0}")]
    Display(#[source] std::io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid recipe: {0}")]
    Recipe(#[from] serde_json::Error),
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            expected,
        }
    }
}
