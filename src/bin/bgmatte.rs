//! bgmatte CLI entry point
//!
//! Command-line interface for removing solid-colored backgrounds from images
//! using the bgmatte library.

#[cfg(feature = "cli")]
use bgmatte::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
