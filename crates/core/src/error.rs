//! Error types for docstrum page segmentation.

use thiserror::Error;

/// Primary error type for layout segmentation.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid angle bounds [{lower}, {upper}]: lower must not exceed upper")]
    InvalidAngleBounds { lower: f64, upper: f64 },

    #[error("between-line multiplier must be finite and positive, got {0}")]
    InvalidMultiplier(f64),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
