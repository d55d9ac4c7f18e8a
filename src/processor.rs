//! Unified matte processor
//!
//! Routes a decoded pixel buffer through the luminance matte or the
//! segmentation delegate according to the configured mode, and guarantees
//! the returned buffer matches the input dimensions in every mode.

use crate::{
    backends::{ModelLoader, UnconfiguredLoader},
    config::{MatteConfig, MatteMode},
    error::Result,
    matte::{apply_matte, Polarity},
    segmentation::SegmentationDelegate,
    session::SessionRegistry,
    types::{MatteResult, ProcessingTimings},
};
use image::{imageops::FilterType, DynamicImage, RgbaImage};
use instant::Instant;
use std::sync::Arc;

/// Matte pipeline over one configuration
///
/// Each `process_image` call owns its buffer exclusively and shares nothing
/// with other invocations except the session registry, so processors (or
/// clones of one registry across processors) can serve concurrent requests.
pub struct MatteProcessor {
    config: MatteConfig,
    delegate: SegmentationDelegate,
}

impl MatteProcessor {
    /// Create a processor with no injected segmentation backend
    ///
    /// Luminance modes are fully functional; segmentation requests fail with
    /// a model load error until a loader is supplied.
    #[must_use]
    pub fn new(config: MatteConfig) -> Self {
        Self::with_loader(config, Arc::new(UnconfiguredLoader))
    }

    /// Create a processor constructing sessions through the given loader
    #[must_use]
    pub fn with_loader(config: MatteConfig, loader: Arc<dyn ModelLoader>) -> Self {
        Self::with_registry(config, Arc::new(SessionRegistry::new(loader)))
    }

    /// Create a processor over a shared session registry
    ///
    /// Server deployments share one registry across request handlers so a
    /// model is loaded once per process, not once per worker.
    #[must_use]
    pub fn with_registry(config: MatteConfig, registry: Arc<SessionRegistry>) -> Self {
        Self {
            config,
            delegate: SegmentationDelegate::new(registry),
        }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &MatteConfig {
        &self.config
    }

    /// Compute the matte for one decoded image
    ///
    /// The returned buffer always has the input's dimensions; if the
    /// segmentation delegate produced another resolution it is resized back
    /// with Lanczos3 before returning.
    ///
    /// # Errors
    /// - Model load or inference failures in segmentation mode; the
    ///   luminance modes are pure computation and cannot fail
    pub async fn process_image(&self, image: &DynamicImage) -> Result<MatteResult> {
        let started = Instant::now();
        let (width, height) = (image.width(), image.height());
        log::debug!(
            "processing {}x{} image in {} mode",
            width,
            height,
            self.config.mode
        );

        let process_start = Instant::now();
        let mut output = match self.config.mode {
            MatteMode::Dark => self.luminance_matte(image, Polarity::Dark),
            MatteMode::Light => self.luminance_matte(image, Polarity::Light),
            MatteMode::Segmentation => {
                self.delegate
                    .segment(image, &self.config.model, self.config.alpha_matting)
                    .await?
            },
        };
        let process_ms = process_start.elapsed().as_millis() as u64;

        // Dimension guarantee, regardless of mode
        if output.dimensions() != (width, height) {
            output = restore_dimensions(&output, width, height);
        }

        let timings = ProcessingTimings {
            decode_ms: None,
            process_ms,
            total_ms: started.elapsed().as_millis() as u64,
        };
        Ok(MatteResult::new(output, (width, height), timings))
    }

    /// Pixel-for-pixel luminance matte; never changes dimensions
    fn luminance_matte(&self, image: &DynamicImage, polarity: Polarity) -> RgbaImage {
        let mut rgba = image.to_rgba8();
        apply_matte(
            &mut rgba,
            polarity,
            self.config.threshold,
            self.config.effective_softness(),
            self.config.despill,
        );
        rgba
    }
}

/// Resize a buffer back to the original dimensions with a high-quality filter
fn restore_dimensions(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    log::debug!(
        "restoring output from {}x{} to {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    image::imageops::resize(image, width, height, FilterType::Lanczos3)
}
