//! Perceptual luminance (ITU-R BT.709)

use image::RgbaImage;
use ndarray::Array2;

/// BT.709 red weight
pub const BT709_RED: f32 = 0.2126;
/// BT.709 green weight
pub const BT709_GREEN: f32 = 0.7152;
/// BT.709 blue weight
pub const BT709_BLUE: f32 = 0.0722;

/// Perceived brightness of a pixel as the BT.709 weighted sum
///
/// Inputs are channel values in [0, 255]; the output stays in [0, 255]
/// without clamping since the weights sum to 1.
#[inline]
#[must_use]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    BT709_RED * r + BT709_GREEN * g + BT709_BLUE * b
}

/// Transient per-pixel luminance plane derived from an RGBA buffer
///
/// Exists only for the duration of a single matte computation; it is built
/// before any despill mutation so the ramp always sees the input colors.
#[derive(Debug, Clone)]
pub struct LuminanceField {
    // Row-major [height, width], matching image coordinates (y, x)
    values: Array2<f32>,
}

impl LuminanceField {
    /// Compute the luminance plane of an image
    #[must_use]
    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut values = Array2::zeros((height as usize, width as usize));
        for (x, y, pixel) in image.enumerate_pixels() {
            values[(y as usize, x as usize)] = luminance(
                f32::from(pixel[0]),
                f32::from(pixel[1]),
                f32::from(pixel[2]),
            );
        }
        Self { values }
    }

    /// Luminance at pixel coordinates
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y as usize, x as usize)]
    }

    /// Plane dimensions as (width, height)
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let (rows, cols) = self.values.dim();
        (cols as u32, rows as u32)
    }
}
