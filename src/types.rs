//! Core result types for matte operations

use crate::error::{MatteError, Result};
use image::{GrayImage, RgbaImage};
use std::path::Path;

/// Per-stage timing breakdown in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingTimings {
    /// Time decoding input bytes, when decoding happened inside this crate
    pub decode_ms: Option<u64>,
    /// Time in the matte kernel or the segmentation delegate
    pub process_ms: u64,
    /// End-to-end time of the pipeline invocation
    pub total_ms: u64,
}

/// Result of a background removal operation
///
/// The image is RGBA with the computed matte in its alpha channel; its
/// dimensions always equal the input's, regardless of mode.
#[derive(Debug, Clone)]
pub struct MatteResult {
    /// The processed image with background removed
    pub image: RgbaImage,

    /// Original input dimensions (width, height)
    pub original_dimensions: (u32, u32),

    /// Timing breakdown of the invocation
    pub timings: ProcessingTimings,
}

impl MatteResult {
    /// Create a new matte result
    #[must_use]
    pub fn new(image: RgbaImage, original_dimensions: (u32, u32), timings: ProcessingTimings) -> Self {
        Self {
            image,
            original_dimensions,
            timings,
        }
    }

    /// Result dimensions (width, height)
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Extract the alpha plane as a standalone mask
    #[must_use]
    pub fn alpha_mask(&self) -> AlphaMask {
        let data = self.image.pixels().map(|pixel| pixel[3]).collect();
        AlphaMask {
            data,
            dimensions: self.image.dimensions(),
        }
    }

    /// Encode the result as PNG bytes (lossless, alpha preserved)
    ///
    /// # Errors
    /// - PNG encoding failure
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(MatteError::encode)?;
        Ok(buffer)
    }

    /// Save the result as a PNG file
    ///
    /// # Errors
    /// - PNG encoding or file write failure
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(MatteError::encode)?;
        Ok(())
    }
}

/// Grayscale alpha plane extracted from a matte result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    /// Alpha values (0-255), row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl AlphaMask {
    /// Fraction of pixels that are not fully transparent
    #[must_use]
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let visible = self.data.iter().filter(|&&alpha| alpha > 0).count();
        visible as f64 / self.data.len() as f64
    }

    /// Convert the mask into a grayscale image
    #[must_use]
    pub fn to_image(&self) -> Option<GrayImage> {
        let (width, height) = self.dimensions;
        GrayImage::from_raw(width, height, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample_result() -> MatteResult {
        let mut image = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 0]));
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([10, 20, 30, 128]));
        MatteResult::new(image, (4, 2), ProcessingTimings::default())
    }

    #[test]
    fn test_alpha_mask_extraction() {
        let result = sample_result();
        let mask = result.alpha_mask();

        assert_eq!(mask.dimensions, (4, 2));
        assert_eq!(mask.data.len(), 8);
        assert_eq!(mask.data[0], 255);
        assert_eq!(mask.data[1], 128);
        assert_eq!(mask.data[2], 0);
    }

    #[test]
    fn test_alpha_mask_coverage() {
        let result = sample_result();
        let mask = result.alpha_mask();
        // 2 of 8 pixels carry any alpha
        assert!((mask.coverage() - 0.25).abs() < 1e-9);

        let empty = AlphaMask {
            data: Vec::new(),
            dimensions: (0, 0),
        };
        assert_eq!(empty.coverage(), 0.0);
    }

    #[test]
    fn test_alpha_mask_to_image() {
        let mask = sample_result().alpha_mask();
        let gray = mask.to_image().unwrap();
        assert_eq!(gray.dimensions(), (4, 2));
        assert_eq!(gray.get_pixel(0, 0).0, [255]);
        assert_eq!(gray.get_pixel(2, 0).0, [0]);
    }

    #[test]
    fn test_png_bytes_carry_signature() {
        let bytes = sample_result().to_png_bytes().unwrap();
        // PNG magic number; the encode collaborator must stay lossless PNG
        assert_eq!(&bytes[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        sample_result().save_png(&path).unwrap();
        assert!(path.exists());

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.dimensions(), (4, 2));
        assert_eq!(reloaded.get_pixel(1, 0)[3], 128);
    }
}
