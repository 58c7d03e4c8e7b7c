//! Standalone converter from numbered page images to one PDF

use anyhow::Context;
use clap::Parser;
use manual_downloader::logging::setup_logging;
use manual_downloader::output::{assemble_directory, Artifact};
use std::path::PathBuf;

/// Assemble `<first>.png` .. `<last>.png` from a directory into a PDF
#[derive(Parser, Debug)]
#[command(name = "manual-convert")]
#[command(version)]
#[command(about = "Convert numbered page images into a PDF", long_about = None)]
struct Cli {
    /// Directory containing the page images
    #[arg(value_name = "PATH")]
    source: PathBuf,

    /// First image file number
    #[arg(short, long = "first", value_name = "NUMBER", default_value_t = 1)]
    first: u32,

    /// Last image file number
    #[arg(short, long = "last", value_name = "NUMBER")]
    last: u32,

    /// Output path (defaults to manual.pdf in the current directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// PDF page resolution in DPI
    #[arg(short, long, value_name = "QUALITY", default_value_t = 100.0)]
    quality: f32,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let output = match cli.output {
        Some(path) => path,
        None => std::env::current_dir()
            .context("Failed to read the current directory")?
            .join("manual.pdf"),
    };

    println!("Converting images to PDF...");

    let artifact = assemble_directory(&cli.source, cli.first, cli.last, &output, cli.quality)
        .with_context(|| format!("Failed to convert {}", cli.source.display()))?;

    if let Artifact::Document { path, page_count } = artifact {
        println!("✓ Saved {} pages to {}", page_count, path.display());
    }

    Ok(())
}
