//! Sequential batch worker
//!
//! Drains a queue of files one at a time: a file's full pipeline run
//! completes (or fails) before the next begins. Cancellation is cooperative
//! and checked only at file boundaries; an in-flight computation is never
//! interrupted. Per-item outcomes flow through the progress reporter so a UI
//! can consume them without blocking the worker.

use crate::{
    error::Result,
    processor::MatteProcessor,
    services::{
        io::ImageIoService,
        progress::{BatchItemStatus, BatchItemUpdate, NoOpProgressReporter, ProgressReporter},
    },
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Suffix appended to output file stems
pub const OUTPUT_SUFFIX: &str = "_matte";

/// Accounting for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Items whose output was written
    pub completed: usize,
    /// Items that failed; the run continued past them
    pub failed: usize,
    /// Items skipped because their output already existed
    pub skipped: usize,
}

impl BatchStats {
    /// Total number of items accounted for
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.skipped
    }
}

enum ItemOutcome {
    Completed,
    Skipped,
}

/// Worker processing a file queue sequentially through one processor
pub struct BatchWorker {
    processor: MatteProcessor,
    reporter: Box<dyn ProgressReporter>,
    cancel: CancellationToken,
    overwrite: bool,
    output_dir: Option<PathBuf>,
}

impl BatchWorker {
    /// Create a worker with a fresh cancellation token and no-op reporting
    #[must_use]
    pub fn new(processor: MatteProcessor) -> Self {
        Self {
            processor,
            reporter: Box::new(NoOpProgressReporter),
            cancel: CancellationToken::new(),
            overwrite: false,
            output_dir: None,
        }
    }

    /// Set the progress reporter consuming per-item updates
    #[must_use]
    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Overwrite existing outputs instead of skipping them
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Write outputs into a directory instead of next to each input
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// A handle for requesting cancellation from another task
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Output path for an input file
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("output");
        let name = format!("{stem}{OUTPUT_SUFFIX}.png");
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => input.with_file_name(name),
        }
    }

    /// Process the queue, honoring cancellation between files
    ///
    /// A failed item increments the failed counter and the run continues;
    /// nothing is retried.
    pub async fn run(&self, files: &[PathBuf]) -> BatchStats {
        let mut stats = BatchStats::default();
        let total = files.len();
        log::info!("batch started: {total} file(s)");

        for (index, path) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                log::warn!("batch cancelled after {index} of {total} file(s)");
                break;
            }

            let file = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("<unnamed>")
                .to_string();
            self.report_item(index, total, &file, BatchItemStatus::Started);

            match self.process_one(path).await {
                Ok(ItemOutcome::Completed) => {
                    stats.completed += 1;
                    self.report_item(index, total, &file, BatchItemStatus::Completed);
                },
                Ok(ItemOutcome::Skipped) => {
                    stats.skipped += 1;
                    self.report_item(index, total, &file, BatchItemStatus::Skipped);
                },
                Err(err) => {
                    stats.failed += 1;
                    log::error!("{}: {err}", path.display());
                    self.report_item(index, total, &file, BatchItemStatus::Failed(err.to_string()));
                },
            }
        }

        log::info!(
            "batch finished: {} completed, {} failed, {} skipped",
            stats.completed,
            stats.failed,
            stats.skipped
        );
        stats
    }

    fn report_item(&self, index: usize, total: usize, file: &str, status: BatchItemStatus) {
        self.reporter.report_batch_item(BatchItemUpdate {
            index,
            total,
            file: file.to_string(),
            status,
        });
    }

    async fn process_one(&self, path: &Path) -> Result<ItemOutcome> {
        let output = self.output_path(path);
        if !self.overwrite && output.exists() {
            return Ok(ItemOutcome::Skipped);
        }

        let image = ImageIoService::load_image(path)?;
        let result = self.processor.process_image(&image).await?;
        result.save_png(&output)?;
        log::debug!("saved {}", output.display());
        Ok(ItemOutcome::Completed)
    }
}
