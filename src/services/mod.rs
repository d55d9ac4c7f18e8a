//! Service layer separating I/O and progress concerns from matte logic

pub mod io;
pub mod progress;

pub use io::ImageIoService;
pub use progress::{
    BatchItemStatus, BatchItemUpdate, ConsoleProgressReporter, NoOpProgressReporter,
    ProcessingStage, ProgressReporter, ProgressTracker, ProgressUpdate,
};
