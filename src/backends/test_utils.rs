//! Mock segmentation backends for testing
//!
//! These mocks stand in for the external model so session caching and the
//! delegate's normalization can be exercised without an inference engine.

use super::{ModelLoader, SegmentationModel, SegmentationOptions};
use crate::error::{MatteError, Result};
use crate::models::KnownModel;
use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock session producing a fixed-size opaque output
///
/// The output dimensions default to the input's but can be pinned to a
/// different size to exercise the delegate's resize guarantee.
#[derive(Debug)]
pub struct MockSegmentationModel {
    model: KnownModel,
    forced_output_size: Option<(u32, u32)>,
    invocations: AtomicUsize,
}

impl MockSegmentationModel {
    pub fn new(model: KnownModel) -> Self {
        Self {
            model,
            forced_output_size: None,
            invocations: AtomicUsize::new(0),
        }
    }

    /// Force the mock to return an output of the given size
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.forced_output_size = Some((width, height));
        self
    }

    /// Number of times `segment` was called
    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl SegmentationModel for MockSegmentationModel {
    fn model(&self) -> KnownModel {
        self.model
    }

    fn segment(
        &self,
        image: &DynamicImage,
        _options: &SegmentationOptions,
    ) -> Result<DynamicImage> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let (width, height) = self
            .forced_output_size
            .unwrap_or((image.width(), image.height()));
        let output = RgbaImage::from_pixel(width, height, Rgba([0, 128, 0, 255]));
        Ok(DynamicImage::ImageRgba8(output))
    }
}

/// Loader counting constructions, for at-most-once cache assertions
pub struct CountingLoader {
    constructions: AtomicUsize,
    output_size: Option<(u32, u32)>,
}

impl CountingLoader {
    pub fn new() -> Self {
        Self {
            constructions: AtomicUsize::new(0),
            output_size: None,
        }
    }

    pub fn with_output_size(width: u32, height: u32) -> Self {
        Self {
            constructions: AtomicUsize::new(0),
            output_size: Some((width, height)),
        }
    }

    /// Number of sessions constructed so far
    pub fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl Default for CountingLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelLoader for CountingLoader {
    async fn load(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>> {
        self.constructions.fetch_add(1, Ordering::SeqCst);
        let mut mock = MockSegmentationModel::new(model);
        if let Some((width, height)) = self.output_size {
            mock = mock.with_output_size(width, height);
        }
        Ok(Arc::new(mock))
    }
}

/// Loader that always fails, for failure-path assertions
pub struct FailingLoader {
    attempts: AtomicUsize,
}

impl FailingLoader {
    pub fn new() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of load attempts observed
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for FailingLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelLoader for FailingLoader {
    async fn load(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(MatteError::model_load_with_cause(
            model.id(),
            "artifact not found",
        ))
    }
}
