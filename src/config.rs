//! Configuration types for matte operations

use crate::error::MatteError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default luminance threshold used by both frontends
pub const DEFAULT_THRESHOLD: u8 = 35;
/// Default ramp softness used by both frontends
pub const DEFAULT_SOFTNESS: u8 = 25;
/// Lower bound for softness; floored before any division
pub const SOFTNESS_MIN: u8 = 1;
/// Upper bound for softness
pub const SOFTNESS_MAX: u8 = 200;

/// Background removal strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatteMode {
    /// Remove a near-black backdrop: subjects are assumed brighter than the
    /// background (neon line art, wireframes)
    Dark,
    /// Remove a near-white backdrop: subjects are assumed darker than the
    /// background (scans, logos, flat illustration)
    Light,
    /// Delegate to an external neural segmentation model
    Segmentation,
}

impl Default for MatteMode {
    fn default() -> Self {
        Self::Dark
    }
}

impl std::fmt::Display for MatteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
            Self::Segmentation => write!(f, "ai"),
        }
    }
}

impl FromStr for MatteMode {
    type Err = MatteError;

    /// Parse a mode from its flat-configuration string form
    ///
    /// This is the boundary where an unsupported mode value surfaces; once
    /// parsed, the enum cannot carry an invalid mode into the pipeline.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "ai" | "segmentation" => Ok(Self::Segmentation),
            other => Err(MatteError::invalid_parameter(format!(
                "unsupported mode '{other}' (expected: dark, light, ai)"
            ))),
        }
    }
}

/// Configuration for a matte pipeline invocation
///
/// `threshold` and `softness` drive the luminance ramp; `model` and
/// `alpha_matting` apply only in [`MatteMode::Segmentation`]. Out-of-range
/// values are silently clamped before use, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatteConfig {
    /// Background removal strategy
    pub mode: MatteMode,

    /// Luminance threshold (0-255) where the alpha ramp starts
    pub threshold: u8,

    /// Width of the soft transition band (1-200)
    pub softness: u8,

    /// Apply the edge despill corrector to fringe pixels
    pub despill: bool,

    /// Segmentation model identifier (segmentation mode only)
    pub model: String,

    /// Request alpha-matting refinement from the model (segmentation mode only)
    pub alpha_matting: bool,
}

impl Default for MatteConfig {
    fn default() -> Self {
        Self {
            mode: MatteMode::default(),
            threshold: DEFAULT_THRESHOLD,
            softness: DEFAULT_SOFTNESS,
            despill: true,
            model: "silueta".to_string(),
            alpha_matting: false,
        }
    }
}

impl MatteConfig {
    /// Create a new configuration builder for fluent API construction
    #[must_use]
    pub fn builder() -> MatteConfigBuilder {
        MatteConfigBuilder::default()
    }

    /// Softness with the [1, 200] clamp applied
    ///
    /// The pipeline reads softness through this accessor so literal struct
    /// construction cannot reintroduce a division by zero.
    #[must_use]
    pub fn effective_softness(&self) -> u8 {
        self.softness.clamp(SOFTNESS_MIN, SOFTNESS_MAX)
    }
}

/// Builder for `MatteConfig`
#[derive(Debug, Default)]
pub struct MatteConfigBuilder {
    config: MatteConfig,
}

impl MatteConfigBuilder {
    /// Set the background removal mode
    #[must_use]
    pub fn mode(mut self, mode: MatteMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the luminance threshold (0-255)
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the ramp softness; values outside [1, 200] are clamped
    #[must_use]
    pub fn softness(mut self, softness: u8) -> Self {
        self.config.softness = softness.clamp(SOFTNESS_MIN, SOFTNESS_MAX);
        self
    }

    /// Enable or disable edge despill correction
    #[must_use]
    pub fn despill(mut self, despill: bool) -> Self {
        self.config.despill = despill;
        self
    }

    /// Set the segmentation model identifier
    #[must_use]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.config.model = model.into();
        self
    }

    /// Request alpha-matting refinement in segmentation mode
    #[must_use]
    pub fn alpha_matting(mut self, alpha_matting: bool) -> Self {
        self.config.alpha_matting = alpha_matting;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    /// - Empty model identifier while mode is [`MatteMode::Segmentation`]
    pub fn build(self) -> crate::error::Result<MatteConfig> {
        if self.config.mode == MatteMode::Segmentation && self.config.model.is_empty() {
            return Err(MatteError::invalid_parameter(
                "segmentation mode requires a model identifier",
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatteConfig::default();
        assert_eq!(config.mode, MatteMode::Dark);
        assert_eq!(config.threshold, 35);
        assert_eq!(config.softness, 25);
        assert!(config.despill);
        assert_eq!(config.model, "silueta");
        assert!(!config.alpha_matting);
    }

    #[test]
    fn test_builder_chaining() {
        let config = MatteConfig::builder()
            .mode(MatteMode::Light)
            .threshold(200)
            .softness(40)
            .despill(false)
            .build()
            .unwrap();

        assert_eq!(config.mode, MatteMode::Light);
        assert_eq!(config.threshold, 200);
        assert_eq!(config.softness, 40);
        assert!(!config.despill);
    }

    #[test]
    fn test_builder_softness_clamping() {
        // Zero softness would divide by zero; floored to 1
        let config = MatteConfig::builder().softness(0).build().unwrap();
        assert_eq!(config.softness, 1);

        let config = MatteConfig::builder().softness(250).build().unwrap();
        assert_eq!(config.softness, 200);

        let config = MatteConfig::builder().softness(120).build().unwrap();
        assert_eq!(config.softness, 120);
    }

    #[test]
    fn test_effective_softness_reclamps() {
        // Literal construction bypasses the builder; the accessor still clamps
        let config = MatteConfig {
            softness: 0,
            ..MatteConfig::default()
        };
        assert_eq!(config.effective_softness(), 1);

        let config = MatteConfig {
            softness: 255,
            ..MatteConfig::default()
        };
        assert_eq!(config.effective_softness(), 200);
    }

    #[test]
    fn test_builder_rejects_empty_model_in_segmentation_mode() {
        let result = MatteConfig::builder()
            .mode(MatteMode::Segmentation)
            .model("")
            .build();
        assert!(matches!(result, Err(MatteError::InvalidParameter(_))));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("dark".parse::<MatteMode>().unwrap(), MatteMode::Dark);
        assert_eq!("light".parse::<MatteMode>().unwrap(), MatteMode::Light);
        assert_eq!("ai".parse::<MatteMode>().unwrap(), MatteMode::Segmentation);
        assert_eq!(
            "segmentation".parse::<MatteMode>().unwrap(),
            MatteMode::Segmentation
        );

        let err = "sepia".parse::<MatteMode>().unwrap_err();
        assert!(matches!(err, MatteError::InvalidParameter(_)));
        assert!(err.to_string().contains("sepia"));
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [MatteMode::Dark, MatteMode::Light, MatteMode::Segmentation] {
            let parsed: MatteMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_config_serde() {
        let config = MatteConfig::builder()
            .mode(MatteMode::Light)
            .threshold(180)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("threshold"));
        assert!(json.contains("softness"));

        let deserialized: MatteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
