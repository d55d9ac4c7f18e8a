//! Known segmentation model registry and artifact resolution
//!
//! The set of model identifiers is closed and documented; unknown identifiers
//! fail when a session is constructed, not earlier, so luminance-only callers
//! never pay for the validation.

use crate::error::{MatteError, Result};
use std::path::PathBuf;

/// Environment variable overriding the model artifact directory
pub const MODEL_DIR_ENV: &str = "BGMATTE_MODEL_DIR";

/// Documented segmentation models accepted by the delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModel {
    /// Lightweight general-purpose model, the default
    Silueta,
    /// High-detail general-purpose model
    IsnetGeneralUse,
    /// General-purpose U2Net
    U2net,
    /// U2Net variant tuned for people and portraits
    U2netHumanSeg,
    /// High-detail (and slow) BiRefNet
    BirefnetGeneral,
}

impl KnownModel {
    /// Every documented model, in display order
    pub const ALL: [Self; 5] = [
        Self::Silueta,
        Self::IsnetGeneralUse,
        Self::U2net,
        Self::U2netHumanSeg,
        Self::BirefnetGeneral,
    ];

    /// Resolve a caller-supplied identifier against the closed set
    ///
    /// # Errors
    /// - Unknown identifier, reported as a model load failure since this is
    ///   the first step of session construction
    pub fn from_id(id: &str) -> Result<Self> {
        match id {
            "silueta" => Ok(Self::Silueta),
            "isnet-general-use" => Ok(Self::IsnetGeneralUse),
            "u2net" => Ok(Self::U2net),
            "u2net_human_seg" => Ok(Self::U2netHumanSeg),
            "birefnet-general" => Ok(Self::BirefnetGeneral),
            other => Err(MatteError::model_load(format!(
                "unknown model identifier '{other}' (known: {})",
                Self::ALL.map(Self::id).join(", ")
            ))),
        }
    }

    /// Stable string identifier used in configuration and cache keys
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Silueta => "silueta",
            Self::IsnetGeneralUse => "isnet-general-use",
            Self::U2net => "u2net",
            Self::U2netHumanSeg => "u2net_human_seg",
            Self::BirefnetGeneral => "birefnet-general",
        }
    }

    /// Short human-readable description for CLI listings
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Silueta => "Silueta - lightweight and fast (recommended)",
            Self::IsnetGeneralUse => "ISNet - high detail",
            Self::U2net => "U2Net - general purpose",
            Self::U2netHumanSeg => "U2Net Human - people and portraits",
            Self::BirefnetGeneral => "BiRefNet - ultra detail (slow)",
        }
    }

    /// File name of the model artifact inside the artifact directory
    #[must_use]
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::Silueta => "silueta.onnx",
            Self::IsnetGeneralUse => "isnet-general-use.onnx",
            Self::U2net => "u2net.onnx",
            Self::U2netHumanSeg => "u2net_human_seg.onnx",
            Self::BirefnetGeneral => "birefnet-general.onnx",
        }
    }

    /// Full path of the model artifact for this model
    ///
    /// # Errors
    /// - No resolvable artifact directory on this system
    pub fn artifact_path(self) -> Result<PathBuf> {
        Ok(model_artifact_dir()?.join(self.artifact_name()))
    }
}

impl std::fmt::Display for KnownModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Directory where model artifacts are expected
///
/// `BGMATTE_MODEL_DIR` overrides; otherwise the XDG cache directory is used:
/// - Linux/macOS: `~/.cache/bgmatte/models/`
/// - Windows: `%LOCALAPPDATA%/bgmatte/models/`
///
/// # Errors
/// - Neither the environment override nor a user cache directory is available
pub fn model_artifact_dir() -> Result<PathBuf> {
    if let Ok(dir_override) = std::env::var(MODEL_DIR_ENV) {
        return Ok(PathBuf::from(dir_override));
    }

    dirs::cache_dir()
        .map(|dir| dir.join("bgmatte").join("models"))
        .ok_or_else(|| {
            MatteError::model_load(format!(
                "failed to determine model directory; set {MODEL_DIR_ENV}"
            ))
        })
}
