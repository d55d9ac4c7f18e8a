//! Error types for matte and segmentation operations

use thiserror::Error;

/// Result type alias for matte operations
pub type Result<T> = std::result::Result<T, MatteError>;

/// Error taxonomy for background matting operations
///
/// Decode failures are kept distinct from matte computation failures, and
/// model-load failures distinct from per-image inference failures, so callers
/// can fall back (e.g. from segmentation to a luminance mode) or continue a
/// batch after a bad item. Nothing in this crate retries automatically.
#[derive(Error, Debug)]
pub enum MatteError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or unsupported image bytes
    #[error("Decode error: {0}")]
    Decode(#[source] image::ImageError),

    /// Failure while encoding or saving a result image
    #[error("Encode error: {0}")]
    Encode(#[source] image::ImageError),

    /// Invalid caller-supplied parameter (e.g. an unsupported mode value)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Segmentation session construction failed (missing artifact, unknown model)
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// A specific image failed AI segmentation
    #[error("Inference error: {0}")]
    Inference(String),
}

impl MatteError {
    /// Create a decode error from an underlying image error
    pub fn decode(error: image::ImageError) -> Self {
        Self::Decode(error)
    }

    /// Create an encode error from an underlying image error
    pub fn encode(error: image::ImageError) -> Self {
        Self::Encode(error)
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new model load error
    pub fn model_load<S: Into<String>>(msg: S) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a model load error carrying the model identifier and cause
    pub fn model_load_with_cause(model_id: &str, cause: &str) -> Self {
        Self::ModelLoad(format!("failed to load model '{model_id}': {cause}"))
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    /// Create an inference error carrying the model identifier and cause
    pub fn inference_with_model(model_id: &str, cause: &str) -> Self {
        Self::Inference(format!("model '{model_id}' failed: {cause}"))
    }
}
