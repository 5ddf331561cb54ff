//! CLI binary: convert a folder of JPEG images to PNG.
//!
//! A thin shim over the library crate; see `batchconv::cli` for the shared
//! flags and run flow.

use anyhow::Result;
use batchconv::cli::{init_logging, run_batch, CommonArgs};
use batchconv::{ImageConverter, ImageOptions, JPG_TO_PNG};
use clap::Parser;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every .jpg/.jpeg in a folder, PNGs written alongside
  jpg2png ~/photos

  # Whole tree, into a separate folder, numbered
  jpg2png -r -o ~/converted -p counter ~/photos

  # Preview the names without writing anything
  jpg2png -l -p timestamp ~/photos

  # Fastest encoding (larger files)
  jpg2png -q 0 ~/photos

  # Ask for the folder
  jpg2png

NAMING POLICIES:
  none        beach.jpg → beach.png
  timestamp   beach.jpg → 20260101_093000_beach.png
  counter     beach.jpg → converted_001_beach.png
  batch-name  beach.jpg → photos_beach.png   (alias: batch)

Files whose PNG is already newer than the JPEG are skipped.

ENVIRONMENT VARIABLES:
  BATCHCONV_ROOT, BATCHCONV_OUTPUT, BATCHCONV_RECURSIVE,
  BATCHCONV_NAMING_POLICY, BATCHCONV_LIST_ONLY, BATCHCONV_QUALITY,
  BATCHCONV_JSON, BATCHCONV_NO_PROGRESS, BATCHCONV_VERBOSE, BATCHCONV_QUIET
  RUST_LOG    Override the log filter (e.g. RUST_LOG=batchconv=debug)
"#;

/// Convert every JPEG in a folder to PNG.
#[derive(Parser, Debug)]
#[command(
    name = "jpg2png",
    version,
    about = "Batch-convert JPEG images to PNG",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// PNG compression level: 0 fastest/largest … 9 slowest/smallest.
    #[arg(short, long, env = "BATCHCONV_QUALITY", default_value_t = 9,
          value_parser = clap::value_parser!(u8).range(0..=9))]
    quality: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.common);

    let options = ImageOptions::new(cli.quality)?;
    run_batch(&cli.common, &JPG_TO_PNG, || Ok(ImageConverter::new(options)))
}
