//! CLI binary: extract the text of a folder of PDFs into DOCX documents.
//!
//! A thin shim over the library crate; see `batchconv::cli` for the shared
//! flags and run flow.

use anyhow::Result;
use batchconv::cli::{init_logging, run_batch, CommonArgs};
use batchconv::{DocumentConverter, DocumentOptions, PDF_TO_DOCX};
use clap::Parser;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every .pdf in a folder, DOCX written alongside
  pdf2docx ~/reports

  # Whole tree, into a separate folder, prefixed with the folder name
  pdf2docx -r -o ~/docx -p batch ~/reports

  # Preview the names (no pdfium needed)
  pdf2docx -l ~/reports

  # Encrypted PDFs sharing one password
  pdf2docx --password s3cret ~/statements

Each page becomes one paragraph; layout, fonts and images are not kept.
Files whose DOCX is already newer than the PDF are skipped.

ENVIRONMENT VARIABLES:
  BATCHCONV_ROOT, BATCHCONV_OUTPUT, BATCHCONV_RECURSIVE,
  BATCHCONV_NAMING_POLICY, BATCHCONV_LIST_ONLY, BATCHCONV_PDF_PASSWORD,
  BATCHCONV_JSON, BATCHCONV_NO_PROGRESS, BATCHCONV_VERBOSE, BATCHCONV_QUIET
  PDFIUM_LIB_PATH   Path to a libpdfium file (default: system library)
  RUST_LOG          Override the log filter

SETUP:
  pdfium is loaded at runtime. Install it system-wide or download a build
  from https://github.com/bblanchon/pdfium-binaries/releases and point
  PDFIUM_LIB_PATH at the library file.
"#;

/// Extract the text of every PDF in a folder into DOCX.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2docx",
    version,
    about = "Batch-convert PDF documents to DOCX (text only)",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// PDF user password, tried on every file of the batch.
    #[arg(long, env = "BATCHCONV_PDF_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.common);

    let options = DocumentOptions {
        password: cli.password,
    };
    run_batch(&cli.common, &PDF_TO_DOCX, || DocumentConverter::new(options))
}
