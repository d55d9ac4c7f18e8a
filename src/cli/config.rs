//! Configuration conversion utilities for CLI arguments

use super::main::{Cli, CliMode};
use crate::config::{MatteConfig, MatteMode};
use crate::error::Result;

/// Converts parsed CLI arguments into the library configuration
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a `MatteConfig` from CLI arguments
    ///
    /// # Errors
    /// - Invalid argument combinations rejected by the config builder
    pub(crate) fn from_cli(cli: &Cli) -> Result<MatteConfig> {
        MatteConfig::builder()
            .mode(Self::mode_from_cli(cli.mode))
            .threshold(cli.threshold)
            .softness(cli.softness)
            .despill(!cli.no_despill)
            .model(cli.model.clone())
            .alpha_matting(cli.alpha_matting)
            .build()
    }

    fn mode_from_cli(mode: CliMode) -> MatteMode {
        match mode {
            CliMode::Dark => MatteMode::Dark,
            CliMode::Light => MatteMode::Light,
            CliMode::Ai => MatteMode::Segmentation,
        }
    }
}
