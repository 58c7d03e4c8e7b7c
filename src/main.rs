//! Manual-Downloader main entry point
//!
//! This is the command-line interface that downloads a paginated viewer
//! document page by page.

use anyhow::Context;
use clap::Parser;
use manual_downloader::config::{load_config_or_default, validate, Config, OutputFormat};
use manual_downloader::logging::setup_logging;
use manual_downloader::output::{assemble_outcome_with_interrupt, AssembleError};
use manual_downloader::{walk, Artifact, ManualError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Manual-Downloader: download a paginated document viewer
///
/// Starting from URL, every page's image is saved as `<page>.png` in the
/// output directory, following each page's "next" link until the document
/// ends. In PDF mode the images are then assembled into one document.
#[derive(Parser, Debug)]
#[command(name = "manual-downloader")]
#[command(version)]
#[command(about = "Download a paginated document viewer", long_about = None)]
struct Cli {
    /// URL of the first page to download
    #[arg(value_name = "URL")]
    url: String,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output directory (defaults to the current directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// PDF page resolution in DPI
    #[arg(short, long, value_name = "QUALITY")]
    quality: Option<f32>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Trace every step instead of showing a progress bar (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = build_config(&cli)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let outcome = tokio::select! {
        result = walk(&config, &cli.url) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, leaving saved pages unassembled");
            return Ok(());
        }
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Download failed: {}", e);
            return Err(e.into());
        }
    };

    let assembly = tokio::task::spawn_blocking({
        let config = config.clone();
        let interrupted = Arc::clone(&interrupted);
        move || assemble_outcome_with_interrupt(&config, &outcome, interrupted)
    });

    match assembly.await.context("Assembly task panicked")? {
        Ok(Some(Artifact::Document { path, page_count })) => {
            println!("✓ Saved {} pages to {}", page_count, path.display());
        }
        Ok(Some(Artifact::ImageSet {
            directory,
            first_page,
            last_page,
        })) => {
            println!(
                "✓ Saved pages {}..={} to {}",
                first_page,
                last_page,
                directory.display()
            );
        }
        Ok(None) => println!("No pages found at {}", cli.url),
        Err(ManualError::Assemble(AssembleError::Interrupted)) => {
            tracing::warn!("Interrupted, no document written");
        }
        Err(e) => {
            tracing::error!("Assembly failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Loads the configuration file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_config_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration {:?}", cli.config))?;

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(quality) = cli.quality {
        config.output.quality = quality;
    }
    config.verbosity = cli.verbose;

    validate(&config).context("Invalid configuration")?;

    tracing::debug!(
        "Format: {}, output: {}",
        config.output.format,
        config.output.directory.display()
    );

    Ok(config)
}
