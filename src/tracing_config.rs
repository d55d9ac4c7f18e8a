//! Tracing initialization for the CLI
//!
//! Library modules log through the `log` facade; the CLI installs a tracing
//! subscriber (with log-record capture) configured from the verbosity flags.
//! `RUST_LOG` takes precedence over the flag-derived filter when set.

use tracing_subscriber::EnvFilter;

/// Output format for tracing events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Human-readable console output
    #[default]
    Console,
    /// Newline-delimited JSON events
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Builder for the CLI tracing subscriber
#[derive(Debug, Default)]
pub struct TracingConfig {
    verbosity: u8,
    format: TracingFormat,
}

impl TracingConfig {
    /// Create a configuration with default (warn-level) verbosity
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity from the repeated `-v` flag count
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Level string derived from the verbosity count
    #[must_use]
    pub fn level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Install the global subscriber
    ///
    /// # Errors
    /// - A global subscriber is already installed
    pub fn init(self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("bgmatte={}", self.level())));

        match self.format {
            TracingFormat::Console => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?,
            #[cfg(feature = "tracing-json")]
            TracingFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?,
        }

        tracing::debug!(level = self.level(), "tracing initialized");
        Ok(())
    }
}
