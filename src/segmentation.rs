//! Segmentation delegate
//!
//! Adapter between the matte pipeline and the external neural model: resolves
//! a cached session for the requested model identifier, invokes it with the
//! fixed refinement constants, and normalizes whatever comes back to the
//! pipeline contract (RGBA, input dimensions).

use crate::backends::SegmentationOptions;
use crate::error::Result;
use crate::models::KnownModel;
use crate::session::SessionRegistry;
use image::{imageops::FilterType, DynamicImage, RgbaImage};
use std::sync::Arc;

/// Delegate routing segmentation requests through the session registry
pub struct SegmentationDelegate {
    registry: Arc<SessionRegistry>,
}

impl SegmentationDelegate {
    /// Create a delegate over a (possibly shared) session registry
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry backing this delegate
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Segment one image with the named model
    ///
    /// The first call for a model identifier pays the session construction
    /// cost; later calls reuse the cached session. Output is normalized to
    /// RGBA and resized back to the input dimensions if the model altered
    /// resolution.
    ///
    /// # Errors
    /// - [`MatteError::ModelLoad`](crate::error::MatteError::ModelLoad) when
    ///   the identifier is unknown or session construction fails
    /// - [`MatteError::Inference`](crate::error::MatteError::Inference) when
    ///   this specific image fails segmentation
    pub async fn segment(
        &self,
        image: &DynamicImage,
        model_id: &str,
        alpha_matting: bool,
    ) -> Result<RgbaImage> {
        let model = KnownModel::from_id(model_id)?;
        let session = self.registry.resolve(model).await?;

        let options = SegmentationOptions::new(alpha_matting);
        log::debug!(
            "segmenting {}x{} image with '{}' (alpha_matting: {})",
            image.width(),
            image.height(),
            model.id(),
            alpha_matting
        );
        let output = session.segment(image, &options)?;

        Ok(normalize_output(output, image.width(), image.height()))
    }
}

/// Normalize model output to the pipeline contract
///
/// Converts any channel layout to RGBA and restores the original resolution
/// with Lanczos3 resampling when the model returned a different size.
fn normalize_output(output: DynamicImage, width: u32, height: u32) -> RgbaImage {
    let rgba = output.into_rgba8();
    if rgba.dimensions() == (width, height) {
        return rgba;
    }
    log::debug!(
        "model output {}x{} resized to {}x{}",
        rgba.width(),
        rgba.height(),
        width,
        height
    );
    image::imageops::resize(&rgba, width, height, FilterType::Lanczos3)
}
