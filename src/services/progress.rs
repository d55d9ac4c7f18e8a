//! Progress reporting service
//!
//! Progress is delivered through a reporter trait so frontends can consume
//! updates (console log, progress bar, UI) without the worker blocking on
//! them.

use crate::types::ProcessingTimings;
use instant::Instant;

/// Progress stages during a matte operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Loading and decoding the input image
    ImageLoading,
    /// Computing the luminance matte
    LuminanceMatte,
    /// Running delegated AI segmentation
    Segmentation,
    /// Restoring output dimensions
    DimensionRestore,
    /// Saving the result
    FileSaving,
    /// Processing completed
    Completed,
}

impl ProcessingStage {
    /// Human-readable description of the stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::ImageLoading => "Loading input image",
            Self::LuminanceMatte => "Computing luminance matte",
            Self::Segmentation => "Running AI segmentation",
            Self::DimensionRestore => "Restoring output dimensions",
            Self::FileSaving => "Saving result",
            Self::Completed => "Processing completed",
        }
    }

    /// Typical progress percentage when this stage begins
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        match self {
            Self::ImageLoading => 10,
            Self::LuminanceMatte | Self::Segmentation => 40,
            Self::DimensionRestore => 85,
            Self::FileSaving => 95,
            Self::Completed => 100,
        }
    }
}

/// Progress update containing stage and timing information
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current processing stage
    pub stage: ProcessingStage,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Human-readable stage description
    pub description: String,
    /// Elapsed time since processing started (milliseconds)
    pub elapsed_ms: u64,
}

impl ProgressUpdate {
    /// Create a new progress update
    #[must_use]
    pub fn new(stage: ProcessingStage, start_time: Instant) -> Self {
        Self {
            progress: stage.progress_percentage(),
            description: stage.description().to_string(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            stage,
        }
    }

    /// Create a progress update with a custom description
    #[must_use]
    pub fn with_description(
        stage: ProcessingStage,
        description: String,
        start_time: Instant,
    ) -> Self {
        Self {
            progress: stage.progress_percentage(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            stage,
            description,
        }
    }
}

/// Outcome of one item in a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItemStatus {
    /// The item is about to be processed
    Started,
    /// Output written successfully
    Completed,
    /// Existing output found; item skipped by caller policy
    Skipped,
    /// The item failed; the run continues
    Failed(String),
}

/// Per-item notification emitted by the batch worker
#[derive(Debug, Clone)]
pub struct BatchItemUpdate {
    /// Zero-based item index
    pub index: usize,
    /// Total number of items in the run
    pub total: usize,
    /// Display name of the item (file name)
    pub file: String,
    /// What happened to the item
    pub status: BatchItemStatus,
}

/// Trait for consuming progress during matte operations
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update
    fn report_progress(&self, update: ProgressUpdate);

    /// Report processing completion with final timings
    fn report_completion(&self, timings: ProcessingTimings);

    /// Report an error during processing
    fn report_error(&self, stage: ProcessingStage, error: &str);

    /// Report a batch item transition
    fn report_batch_item(&self, update: BatchItemUpdate) {
        // Default implementation does nothing - batch-aware reporters override
        drop(update);
    }
}

/// No-op progress reporter that discards all updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _update: ProgressUpdate) {
        // Intentionally empty
    }

    fn report_completion(&self, _timings: ProcessingTimings) {
        // Intentionally empty
    }

    fn report_error(&self, _stage: ProcessingStage, _error: &str) {
        // Intentionally empty
    }
}

/// Console progress reporter that logs updates
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    /// Create a new console progress reporter
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_progress(&self, update: ProgressUpdate) {
        if self.verbose {
            log::info!(
                "[{}%] {} ({}ms elapsed)",
                update.progress,
                update.description,
                update.elapsed_ms
            );
        } else {
            log::info!("[{}%] {}", update.progress, update.description);
        }
    }

    fn report_completion(&self, timings: ProcessingTimings) {
        log::info!("completed in {}ms", timings.total_ms);
        if self.verbose {
            if let Some(decode_ms) = timings.decode_ms {
                log::info!("  decode: {decode_ms}ms");
            }
            log::info!("  process: {}ms", timings.process_ms);
        }
    }

    fn report_error(&self, stage: ProcessingStage, error: &str) {
        log::error!("error during {}: {error}", stage.description());
    }

    fn report_batch_item(&self, update: BatchItemUpdate) {
        let position = format!("[{}/{}]", update.index + 1, update.total);
        match update.status {
            BatchItemStatus::Started => log::info!("{position} {}", update.file),
            BatchItemStatus::Completed => log::info!("{position} {} done", update.file),
            BatchItemStatus::Skipped => {
                log::warn!("{position} {} skipped (output exists)", update.file);
            },
            BatchItemStatus::Failed(ref reason) => {
                log::error!("{position} {} failed: {reason}", update.file);
            },
        }
    }
}

/// Progress tracker that manages timing and stage bookkeeping
pub struct ProgressTracker {
    reporter: Box<dyn ProgressReporter>,
    start_time: Instant,
    current_stage: Option<ProcessingStage>,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified reporter
    #[must_use]
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            start_time: Instant::now(),
            current_stage: None,
        }
    }

    /// Create a tracker that discards all updates
    #[must_use]
    pub fn no_op() -> Self {
        Self::new(Box::new(NoOpProgressReporter))
    }

    /// Report progress for a specific stage
    pub fn report_stage(&mut self, stage: ProcessingStage) {
        self.current_stage = Some(stage.clone());
        self.reporter
            .report_progress(ProgressUpdate::new(stage, self.start_time));
    }

    /// Report progress with a custom description
    pub fn report_stage_with_description(&mut self, stage: ProcessingStage, description: String) {
        self.current_stage = Some(stage.clone());
        self.reporter.report_progress(ProgressUpdate::with_description(
            stage,
            description,
            self.start_time,
        ));
    }

    /// Report completion with final timings
    pub fn report_completion(&self, timings: ProcessingTimings) {
        self.reporter.report_completion(timings);
    }

    /// Report an error at the current stage
    pub fn report_error(&self, error: &str) {
        let stage = self
            .current_stage
            .clone()
            .unwrap_or(ProcessingStage::ImageLoading);
        self.reporter.report_error(stage, error);
    }

    /// Elapsed time since tracking started
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// The current processing stage
    #[must_use]
    pub fn current_stage(&self) -> Option<&ProcessingStage> {
        self.current_stage.as_ref()
    }
}
