//! Segmentation backend boundary
//!
//! The neural model itself is an external collaborator: this crate defines
//! the traits a backend must implement and the fixed invocation constants,
//! but ships no inference engine. Frontends inject a [`ModelLoader`] the same
//! way the processing pipeline would receive any other capability.

use crate::error::{MatteError, Result};
use crate::models::KnownModel;
use async_trait::async_trait;
use image::DynamicImage;
use std::sync::Arc;

// Test utilities for backend testing
#[cfg(test)]
pub mod test_utils;

/// Fixed foreground confidence threshold for alpha-matting refinement (0-255)
pub const ALPHA_MATTING_FOREGROUND_THRESHOLD: u8 = 240;
/// Fixed background confidence threshold for alpha-matting refinement (0-255)
pub const ALPHA_MATTING_BACKGROUND_THRESHOLD: u8 = 10;
/// Fixed erosion size (pixels) for alpha-matting refinement
pub const ALPHA_MATTING_ERODE_SIZE: u32 = 10;

/// Options forwarded to the external model for one inference
///
/// The threshold and erosion constants mirror the engine's own defaults and
/// are fixed for behavioral parity; only the `alpha_matting` switch is
/// caller-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationOptions {
    /// Request alpha-matting edge refinement
    pub alpha_matting: bool,
    /// Foreground confidence threshold (0-255)
    pub foreground_threshold: u8,
    /// Background confidence threshold (0-255)
    pub background_threshold: u8,
    /// Erosion size in pixels
    pub erode_size: u32,
}

impl SegmentationOptions {
    /// Options with the fixed refinement constants and the given switch
    #[must_use]
    pub fn new(alpha_matting: bool) -> Self {
        Self {
            alpha_matting,
            foreground_threshold: ALPHA_MATTING_FOREGROUND_THRESHOLD,
            background_threshold: ALPHA_MATTING_BACKGROUND_THRESHOLD,
            erode_size: ALPHA_MATTING_ERODE_SIZE,
        }
    }
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self::new(false)
    }
}

/// A loaded segmentation model session
///
/// Sessions are constructed once per model identifier by a [`ModelLoader`]
/// and then shared for the lifetime of the process. Inference itself is
/// synchronous CPU/GPU-bound work; only construction is long-latency.
pub trait SegmentationModel: Send + Sync + std::fmt::Debug {
    /// The model this session was constructed for
    fn model(&self) -> KnownModel;

    /// Classify foreground/background for one image
    ///
    /// The output may use any channel layout and resolution; the delegate
    /// normalizes it afterwards.
    ///
    /// # Errors
    /// - Per-image inference failure, reported as [`MatteError::Inference`]
    fn segment(&self, image: &DynamicImage, options: &SegmentationOptions)
        -> Result<DynamicImage>;
}

/// Constructs model sessions; this is the expensive model-load step
///
/// Loading is the sole blocking/suspending point in the whole core, which is
/// why this trait (and nothing else on the inference path) is async.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Construct a session for the given model
    ///
    /// # Errors
    /// - Missing or unreadable model artifact
    /// - Backend-specific initialization failure
    async fn load(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>>;
}

/// Loader used when no backend has been injected
///
/// Keeps luminance-only deployments free of any inference dependency while
/// still failing segmentation requests with an actionable message.
pub struct UnconfiguredLoader;

#[async_trait]
impl ModelLoader for UnconfiguredLoader {
    async fn load(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>> {
        Err(MatteError::model_load_with_cause(
            model.id(),
            "no segmentation backend injected; supply a ModelLoader when building the processor",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_carry_fixed_constants() {
        let options = SegmentationOptions::new(true);
        assert!(options.alpha_matting);
        assert_eq!(options.foreground_threshold, 240);
        assert_eq!(options.background_threshold, 10);
        assert_eq!(options.erode_size, 10);

        let defaults = SegmentationOptions::default();
        assert!(!defaults.alpha_matting);
        assert_eq!(defaults.foreground_threshold, 240);
    }

    #[tokio::test]
    async fn test_unconfigured_loader_fails_with_model_load() {
        let err = UnconfiguredLoader
            .load(KnownModel::Silueta)
            .await
            .unwrap_err();
        assert!(matches!(err, MatteError::ModelLoad(_)));
        assert!(err.to_string().contains("silueta"));
    }
}
