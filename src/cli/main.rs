//! Background matting CLI
//!
//! Batch frontend over the matte pipeline: collects input files, runs the
//! sequential batch worker, and wires Ctrl-C to cooperative cancellation.

use super::config::CliConfigBuilder;
use crate::{
    batch::BatchWorker,
    config::{DEFAULT_SOFTNESS, DEFAULT_THRESHOLD},
    models::KnownModel,
    processor::MatteProcessor,
    services::{
        io::ImageIoService,
        progress::{
            BatchItemStatus, BatchItemUpdate, ConsoleProgressReporter, ProcessingStage,
            ProgressReporter, ProgressUpdate,
        },
    },
    tracing_config::TracingConfig,
    types::ProcessingTimings,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Background matting CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgmatte")]
pub(crate) struct Cli {
    /// Input image files or directories
    #[arg(value_name = "INPUT", required_unless_present = "list_models")]
    pub(crate) input: Vec<PathBuf>,

    /// Output directory [default: next to each input]
    #[arg(short, long, value_name = "DIR")]
    pub(crate) output: Option<PathBuf>,

    /// Background removal mode
    #[arg(short, long, value_enum, default_value_t = CliMode::Dark)]
    pub(crate) mode: CliMode,

    /// Luminance threshold (0-255) where the alpha ramp starts
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub(crate) threshold: u8,

    /// Softness of the alpha ramp (1-200, clamped)
    #[arg(short, long, default_value_t = DEFAULT_SOFTNESS)]
    pub(crate) softness: u8,

    /// Disable edge despill correction
    #[arg(long)]
    pub(crate) no_despill: bool,

    /// Segmentation model identifier (ai mode)
    #[arg(long, default_value = "silueta")]
    pub(crate) model: String,

    /// Request alpha-matting edge refinement (ai mode, slower)
    #[arg(long)]
    pub(crate) alpha_matting: bool,

    /// Process directories recursively
    #[arg(short, long)]
    pub(crate) recursive: bool,

    /// File name pattern for directory scanning (e.g. "*.png")
    #[arg(long)]
    pub(crate) pattern: Option<String>,

    /// Overwrite existing outputs instead of skipping them
    #[arg(long)]
    pub(crate) overwrite: bool,

    /// List known segmentation models and exit
    #[arg(long)]
    pub(crate) list_models: bool,

    /// Enable verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

/// CLI-facing mode names
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub(crate) enum CliMode {
    /// Remove a black / dark background
    Dark,
    /// Remove a white / light background
    Light,
    /// Delegate to an external AI segmentation model
    Ai,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    TracingConfig::new()
        .with_verbosity(cli.verbose)
        .init()
        .context("Failed to initialize tracing")?;

    if cli.list_models {
        list_models();
        return Ok(());
    }

    if cli.input.is_empty() {
        anyhow::bail!("at least one input is required");
    }

    if cli.mode == CliMode::Ai {
        // Same stance as the library: the model is an external collaborator
        anyhow::bail!(
            "no segmentation backend is linked into this binary; use --mode dark or \
             --mode light, or drive segmentation through the library API with an \
             injected ModelLoader"
        );
    }

    let config = CliConfigBuilder::from_cli(&cli).context("Invalid CLI arguments")?;
    info!(
        "mode: {}, threshold: {}, softness: {}, despill: {}",
        config.mode, config.threshold, config.softness, config.despill
    );

    let files = collect_files(&cli)?;
    if files.is_empty() {
        warn!("no supported image files found in the provided inputs");
        return Ok(());
    }
    info!("found {} image file(s) to process", files.len());

    let bar = (files.len() > 1).then(|| batch_progress_bar(files.len() as u64));
    let reporter: Box<dyn ProgressReporter> = match &bar {
        Some(bar) => Box::new(IndicatifReporter { bar: bar.clone() }),
        None => Box::new(ConsoleProgressReporter::new(cli.verbose > 0)),
    };

    let worker = BatchWorker::new(MatteProcessor::new(config))
        .with_overwrite(cli.overwrite)
        .with_output_dir(cli.output.clone())
        .with_reporter(reporter);

    let token = worker.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing the current file");
            token.cancel();
        }
    });

    let started = Instant::now();
    let stats = worker.run(&files).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    info!(
        "{} completed, {} failed, {} skipped in {:.2}s",
        stats.completed,
        stats.failed,
        stats.skipped,
        started.elapsed().as_secs_f64()
    );

    if stats.failed > 0 {
        anyhow::bail!("{} file(s) failed", stats.failed);
    }
    Ok(())
}

/// Print the known model identifiers and the artifact location
fn list_models() {
    println!("Known segmentation models:");
    for model in KnownModel::ALL {
        println!("  {:<18} {}", model.id(), model.description());
    }
    match crate::models::model_artifact_dir() {
        Ok(dir) => println!("\nModel artifacts are resolved from: {}", dir.display()),
        Err(err) => println!("\n{err}"),
    }
}

/// Collect supported image files from the CLI inputs, sorted and deduplicated
fn collect_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let pattern = cli
        .pattern
        .as_deref()
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid --pattern")?;

    let mut files = Vec::new();
    for input in &cli.input {
        if input.is_file() {
            if ImageIoService::is_supported_extension(input) {
                files.push(input.clone());
            } else {
                warn!("skipping unsupported file: {}", input.display());
            }
        } else if input.is_dir() {
            collect_dir(input, cli.recursive, pattern.as_ref(), &mut files);
        } else {
            anyhow::bail!(
                "input path does not exist or is not accessible: {}",
                input.display()
            );
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_dir(
    dir: &Path,
    recursive: bool,
    pattern: Option<&glob::Pattern>,
    files: &mut Vec<PathBuf>,
) {
    let max_depth = if recursive { usize::MAX } else { 1 };
    for entry in WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !ImageIoService::is_supported_extension(path) {
            continue;
        }
        if let Some(pattern) = pattern {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            if !pattern.matches(name) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }
}

fn batch_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar
}

/// Batch reporter driving the indicatif progress bar
struct IndicatifReporter {
    bar: ProgressBar,
}

impl ProgressReporter for IndicatifReporter {
    fn report_progress(&self, _update: ProgressUpdate) {}

    fn report_completion(&self, _timings: ProcessingTimings) {}

    fn report_error(&self, _stage: ProcessingStage, error: &str) {
        self.bar.println(format!("error: {error}"));
    }

    fn report_batch_item(&self, update: BatchItemUpdate) {
        match update.status {
            BatchItemStatus::Started => self.bar.set_message(update.file),
            BatchItemStatus::Completed | BatchItemStatus::Skipped => self.bar.inc(1),
            BatchItemStatus::Failed(reason) => {
                self.bar.println(format!("{} failed: {reason}", update.file));
                self.bar.inc(1);
            },
        }
    }
}
