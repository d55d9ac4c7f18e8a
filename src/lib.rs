#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # bgmatte
//!
//! Background matting library with two removal strategies: a luminance
//! threshold matte for near-black or near-white solid backdrops (neon line
//! art, scans, flat logos) and a delegated AI segmentation path for
//! arbitrary photographic backgrounds.
//!
//! The luminance engine maps each pixel's BT.709 luminance through a soft
//! alpha ramp and optionally corrects background color bleed on
//! semi-transparent edge pixels (despill). The segmentation path adapts an
//! injected external model behind a process-scoped, concurrency-safe session
//! cache. In every mode the output buffer has the input's dimensions.
//!
//! ## Features
//!
//! - **Luminance matte**: polarity-parameterized soft ramp for dark and
//!   light backdrops, with fixed-constant edge despill
//! - **Segmentation delegate**: lazy per-model session cache with
//!   at-most-one construction per identifier, output normalization, and
//!   dimension restoration
//! - **Batch worker**: sequential file queue with cooperative cancellation
//!   at file boundaries and per-item error accounting
//! - **CLI**: optional `clap` frontend (enable with the `cli` feature)
//!
//! ## Quick start
//!
//! ```rust
//! use bgmatte::{remove_background_from_bytes, MatteConfig, MatteMode};
//!
//! # async fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
//! let config = MatteConfig::builder()
//!     .mode(MatteMode::Dark)
//!     .threshold(35)
//!     .softness(25)
//!     .despill(true)
//!     .build()?;
//! let result = remove_background_from_bytes(&upload_bytes, &config).await?;
//! let png_bytes = result.to_png_bytes()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Segmentation mode
//!
//! The neural model is an external collaborator: supply a [`ModelLoader`]
//! and the processor caches one session per model identifier for the
//! process lifetime.
//!
//! ```rust,no_run
//! use bgmatte::{MatteConfig, MatteMode, MatteProcessor, ModelLoader};
//! use std::sync::Arc;
//!
//! # async fn example(loader: Arc<dyn ModelLoader>, image: image::DynamicImage) -> anyhow::Result<()> {
//! let config = MatteConfig::builder()
//!     .mode(MatteMode::Segmentation)
//!     .model("isnet-general-use")
//!     .alpha_matting(true)
//!     .build()?;
//! let processor = MatteProcessor::with_loader(config, loader);
//! let result = processor.process_image(&image).await?;
//! result.save_png("output.png")?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod luminance;
pub mod matte;
pub mod models;
pub mod processor;
pub mod segmentation;
pub mod services;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use backends::{
    ModelLoader, SegmentationModel, SegmentationOptions, UnconfiguredLoader,
    ALPHA_MATTING_BACKGROUND_THRESHOLD, ALPHA_MATTING_FOREGROUND_THRESHOLD,
    ALPHA_MATTING_ERODE_SIZE,
};
pub use batch::{BatchStats, BatchWorker, OUTPUT_SUFFIX};
pub use config::{
    MatteConfig, MatteConfigBuilder, MatteMode, DEFAULT_SOFTNESS, DEFAULT_THRESHOLD, SOFTNESS_MAX,
    SOFTNESS_MIN,
};
pub use error::{MatteError, Result};
pub use luminance::{luminance, LuminanceField};
pub use matte::{
    apply_matte, despill_rgb, in_fringe_band, ramp_alpha, Polarity, DESPILL_FACTOR,
    FRINGE_ALPHA_MAX,
};
pub use models::{model_artifact_dir, KnownModel};
pub use processor::MatteProcessor;
pub use segmentation::SegmentationDelegate;
pub use services::{
    BatchItemStatus, BatchItemUpdate, ConsoleProgressReporter, ImageIoService,
    NoOpProgressReporter, ProcessingStage, ProgressReporter, ProgressTracker, ProgressUpdate,
};
pub use session::SessionRegistry;
pub use types::{AlphaMask, MatteResult, ProcessingTimings};

#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};

/// Remove the background from an image provided as bytes
///
/// Decodes the bytes, runs the matte pipeline, and returns the result. This
/// is the entry point for web servers and other memory-based callers.
/// Segmentation mode requires an injected loader; use
/// [`MatteProcessor::with_loader`] for that instead.
///
/// # Errors
/// - [`MatteError::Decode`] for unreadable or unsupported image bytes
/// - Pipeline errors from [`MatteProcessor::process_image`]
pub async fn remove_background_from_bytes(
    image_bytes: &[u8],
    config: &MatteConfig,
) -> Result<MatteResult> {
    let decode_start = instant::Instant::now();
    let image = ImageIoService::decode_bytes(image_bytes)?;
    let decode_ms = decode_start.elapsed().as_millis() as u64;

    let mut result = remove_background_from_image(image, config).await?;
    result.timings.decode_ms = Some(decode_ms);
    result.timings.total_ms += decode_ms;
    Ok(result)
}

/// Remove the background from a pre-decoded image
///
/// # Errors
/// - Pipeline errors from [`MatteProcessor::process_image`]
pub async fn remove_background_from_image(
    image: image::DynamicImage,
    config: &MatteConfig,
) -> Result<MatteResult> {
    let processor = MatteProcessor::new(config.clone());
    processor.process_image(&image).await
}

/// Remove the background from an async reader stream
///
/// Reads the stream to the end and delegates to the bytes-based API.
///
/// # Errors
/// - [`MatteError::Io`] for stream read failures
/// - [`MatteError::Decode`] for unreadable or unsupported image bytes
/// - Pipeline errors from [`MatteProcessor::process_image`]
pub async fn remove_background_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &MatteConfig,
) -> Result<MatteResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;
    remove_background_from_bytes(&buffer, config).await
}
