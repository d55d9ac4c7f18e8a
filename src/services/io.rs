//! Image decode/encode collaborator
//!
//! Decode failures are reported distinctly from matte computation failures so
//! callers (and the batch worker's error accounting) can tell unreadable
//! inputs apart from pipeline problems.

use crate::error::{MatteError, Result};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// File extensions accepted by the frontends
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif"];

/// Service for image decode/encode and file I/O
pub struct ImageIoService;

impl ImageIoService {
    /// Decode raw image bytes into a pixel buffer
    ///
    /// # Errors
    /// - Unreadable or unsupported image bytes, as [`MatteError::Decode`]
    pub fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(MatteError::decode)
    }

    /// Load and decode an image file
    ///
    /// The file is read first so filesystem problems surface as I/O errors,
    /// distinct from decode failures on the bytes themselves.
    ///
    /// # Errors
    /// - File read failure, as [`MatteError::Io`]
    /// - Decode failure, as [`MatteError::Decode`]
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();
        let bytes = std::fs::read(path_ref)?;
        Self::decode_bytes(&bytes).map_err(|err| match err {
            MatteError::Decode(source) => MatteError::Decode(image::ImageError::IoError(
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("failed to decode '{}': {source}", path_ref.display()),
                ),
            )),
            other => other,
        })
    }

    /// Encode a pixel buffer as PNG bytes (lossless, alpha preserved)
    ///
    /// # Errors
    /// - PNG encoding failure, as [`MatteError::Encode`]
    pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(MatteError::encode)?;
        Ok(buffer)
    }

    /// Save a pixel buffer as a PNG file, creating parent directories
    ///
    /// # Errors
    /// - Directory creation or file write failure
    /// - PNG encoding failure
    pub fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        image
            .save_with_format(path_ref, image::ImageFormat::Png)
            .map_err(MatteError::encode)?;
        Ok(())
    }

    /// Whether a path carries a supported image extension
    #[must_use]
    pub fn is_supported_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }
}
