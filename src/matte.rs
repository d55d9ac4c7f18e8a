//! Luminance-keyed alpha ramp and edge despill correction
//!
//! Both the dark- and light-background variants share one ramp expression,
//! parameterized by a [`Polarity`] tag that selects the sign and offset
//! constants. The despill factor and fringe band bounds are fixed constants;
//! they are not user-tunable.

use crate::luminance::LuminanceField;
use image::RgbaImage;

/// Amplification applied to the deviation from the despill pivot
pub const DESPILL_FACTOR: f32 = 1.3;

/// Exclusive upper alpha bound of the fringe band
///
/// Pixels at or above this alpha are treated as safe from background bleed,
/// which is why the bound is 200 rather than 255.
pub const FRINGE_ALPHA_MAX: f32 = 200.0;

/// Ramp polarity: which end of the luminance axis is background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Near-black backdrop; low-luminance pixels become transparent
    Dark,
    /// Near-white backdrop; high-luminance pixels become transparent
    Light,
}

impl Polarity {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Self::Dark => 1.0,
            Self::Light => -1.0,
        }
    }

    #[inline]
    fn offset(self) -> f32 {
        match self {
            Self::Dark => 0.0,
            Self::Light => 255.0,
        }
    }
}

/// Map a luminance value to an alpha value through the soft ramp
///
/// Dark polarity: `clamp((L - threshold) / softness * 255, 0, 255)`.
/// Light polarity: `clamp((threshold - L) / softness * 255 + 255, 0, 255)`.
/// Both are one expression with sign/offset selected by the polarity tag.
/// `softness` must already be floored at 1.
#[inline]
#[must_use]
pub fn ramp_alpha(polarity: Polarity, lum: f32, threshold: f32, softness: f32) -> f32 {
    debug_assert!(softness >= 1.0, "softness must be floored at 1");
    ((lum - threshold) * polarity.sign() / softness * 255.0 + polarity.offset()).clamp(0.0, 255.0)
}

/// Whether a (pre-quantization) alpha value lies in the fringe band
///
/// Only fringe pixels are eligible for despill; fully transparent and
/// mostly-opaque pixels pass through unchanged.
#[inline]
#[must_use]
pub fn in_fringe_band(alpha: f32) -> bool {
    alpha > 0.0 && alpha < FRINGE_ALPHA_MAX
}

/// Push RGB channels away from the background spill direction
///
/// Dark polarity pivots on the pixel's brightest channel (counteracting black
/// bleed), light polarity on its darkest (counteracting white bleed); each
/// channel's deviation from the pivot is amplified by [`DESPILL_FACTOR`].
#[inline]
#[must_use]
pub fn despill_rgb(polarity: Polarity, rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let pivot = match polarity {
        Polarity::Dark => r.max(g).max(b),
        Polarity::Light => r.min(g).min(b),
    };
    rgb.map(|channel| (pivot + (channel - pivot) * DESPILL_FACTOR).clamp(0.0, 255.0))
}

/// Apply the luminance matte in place over an RGBA buffer
///
/// Computes the transient luminance plane first, then rewrites the alpha
/// channel through the ramp and optionally despills fringe pixels. The fringe
/// test uses the float alpha; quantization to `u8` truncates.
pub fn apply_matte(
    image: &mut RgbaImage,
    polarity: Polarity,
    threshold: u8,
    softness: u8,
    despill: bool,
) {
    let field = LuminanceField::from_image(image);
    let threshold = f32::from(threshold);
    let softness = f32::from(softness.max(1));

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let alpha = ramp_alpha(polarity, field.get(x, y), threshold, softness);
        if despill && in_fringe_band(alpha) {
            let corrected = despill_rgb(
                polarity,
                [
                    f32::from(pixel[0]),
                    f32::from(pixel[1]),
                    f32::from(pixel[2]),
                ],
            );
            pixel[0] = corrected[0] as u8;
            pixel[1] = corrected[1] as u8;
            pixel[2] = corrected[2] as u8;
        }
        pixel[3] = alpha as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray_image(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn test_dark_ramp_breakpoints() {
        // At or below threshold: fully transparent
        assert_eq!(ramp_alpha(Polarity::Dark, 0.0, 35.0, 25.0), 0.0);
        assert_eq!(ramp_alpha(Polarity::Dark, 35.0, 35.0, 25.0), 0.0);
        // At or above threshold + softness: fully opaque
        assert_eq!(ramp_alpha(Polarity::Dark, 60.0, 35.0, 25.0), 255.0);
        assert_eq!(ramp_alpha(Polarity::Dark, 255.0, 35.0, 25.0), 255.0);
    }

    #[test]
    fn test_light_ramp_breakpoints() {
        // At or below threshold: fully opaque
        assert_eq!(ramp_alpha(Polarity::Light, 0.0, 200.0, 50.0), 255.0);
        assert_eq!(ramp_alpha(Polarity::Light, 200.0, 200.0, 50.0), 255.0);
        // At or above threshold + softness: fully transparent
        assert_eq!(ramp_alpha(Polarity::Light, 250.0, 200.0, 50.0), 0.0);
        assert_eq!(ramp_alpha(Polarity::Light, 255.0, 200.0, 50.0), 0.0);
    }

    #[test]
    fn test_ramp_midpoint() {
        // L at threshold + softness/2 sits at the middle of the ramp
        let alpha = ramp_alpha(Polarity::Dark, 47.5, 35.0, 25.0);
        assert!((alpha - 127.5).abs() < 1e-3);

        let alpha = ramp_alpha(Polarity::Light, 225.0, 200.0, 50.0);
        assert!((alpha - 127.5).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_monotonicity() {
        let mut previous = ramp_alpha(Polarity::Dark, 0.0, 35.0, 25.0);
        for lum in 1..=255 {
            let alpha = ramp_alpha(Polarity::Dark, lum as f32, 35.0, 25.0);
            assert!(alpha >= previous, "dark ramp must not decrease in L");
            previous = alpha;
        }
    }

    #[test]
    fn test_polarity_mirror_identity() {
        // The light ramp is the dark ramp reflected through L -> 255 - L with
        // the transition band reflected as well: t_dark = 255 - t_light - s
        let (threshold, softness) = (200.0_f32, 50.0_f32);
        for lum in 0..=255 {
            let lum = lum as f32;
            let light = ramp_alpha(Polarity::Light, lum, threshold, softness);
            let dark = ramp_alpha(
                Polarity::Dark,
                255.0 - lum,
                255.0 - threshold - softness,
                softness,
            );
            assert!(
                (light - dark).abs() < 1e-3,
                "mirror mismatch at L={lum}: light={light} dark={dark}"
            );
        }
    }

    #[test]
    fn test_fringe_band_bounds() {
        assert!(!in_fringe_band(0.0));
        assert!(in_fringe_band(0.5));
        assert!(in_fringe_band(127.0));
        assert!(in_fringe_band(199.9));
        assert!(!in_fringe_band(200.0));
        assert!(!in_fringe_band(255.0));
    }

    #[test]
    fn test_despill_dark_pushes_toward_brightest_channel() {
        let [r, g, b] = despill_rgb(Polarity::Dark, [100.0, 50.0, 20.0]);
        // Pivot channel is unchanged; others move away from it, clamped at 0
        assert_eq!(r, 100.0);
        assert_eq!(g, 100.0 + (50.0 - 100.0) * DESPILL_FACTOR);
        assert_eq!(b, 0.0); // 100 + (20 - 100) * 1.3 = -4, clamped
    }

    #[test]
    fn test_despill_light_pushes_toward_darkest_channel() {
        let [r, g, b] = despill_rgb(Polarity::Light, [100.0, 50.0, 20.0]);
        assert_eq!(r, 20.0 + (100.0 - 20.0) * DESPILL_FACTOR);
        assert_eq!(g, 20.0 + (50.0 - 20.0) * DESPILL_FACTOR);
        assert_eq!(b, 20.0);
    }

    #[test]
    fn test_despill_is_identity_on_gray() {
        let rgb = despill_rgb(Polarity::Dark, [90.0, 90.0, 90.0]);
        assert_eq!(rgb, [90.0, 90.0, 90.0]);
    }

    #[test]
    fn test_solid_black_dark_mode_fully_transparent() {
        let mut image = gray_image(10, 10, 0);
        apply_matte(&mut image, Polarity::Dark, 35, 25, false);
        assert!(image.pixels().all(|p| p[3] == 0));
        // RGB untouched when despill is off
        assert!(image.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_solid_white_dark_mode_fully_opaque() {
        // L = 255 >= threshold + softness = 60
        let mut image = gray_image(10, 10, 255);
        apply_matte(&mut image, Polarity::Dark, 35, 25, true);
        assert!(image.pixels().all(|p| p[3] == 255));
        assert!(image
            .pixels()
            .all(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
    }

    #[test]
    fn test_apply_matte_is_idempotent_on_inputs() {
        let mut image = RgbaImage::new(8, 8);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 30) as u8, (y * 30) as u8, 128, 255]);
        }
        let mut first = image.clone();
        let mut second = image.clone();
        apply_matte(&mut first, Polarity::Dark, 35, 25, true);
        apply_matte(&mut second, Polarity::Dark, 35, 25, true);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_despill_applies_only_inside_fringe_band() {
        let colored = Rgba([100, 50, 20, 255]);

        // Fully opaque pixel (alpha 255): despill skipped
        let mut image = RgbaImage::from_pixel(2, 2, colored);
        apply_matte(&mut image, Polarity::Dark, 0, 1, true);
        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel.0, [100, 50, 20, 255]);

        // Fully transparent pixel (alpha 0): despill skipped
        let mut image = RgbaImage::from_pixel(2, 2, colored);
        apply_matte(&mut image, Polarity::Dark, 255, 1, true);
        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel.0, [100, 50, 20, 0]);

        // Fringe pixel: luminance of (100, 50, 20) is ~58.46, so with
        // threshold 0 and softness 200 the alpha is ~74.5 and despill fires
        let mut image = RgbaImage::from_pixel(2, 2, colored);
        apply_matte(&mut image, Polarity::Dark, 0, 200, true);
        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel[0], 100);
        assert_eq!(pixel[1], 35); // 100 + (50 - 100) * 1.3
        assert_eq!(pixel[2], 0); // clamped at zero
        assert!(pixel[3] > 0 && pixel[3] < 200);
    }

    #[test]
    fn test_quantization_truncates() {
        // Gray 47: alpha = (47 - 35) / 25 * 255 = 122.4 -> 122
        let mut image = gray_image(1, 1, 47);
        apply_matte(&mut image, Polarity::Dark, 35, 25, false);
        assert_eq!(image.get_pixel(0, 0)[3], 122);
    }
}
