//! # batchconv
//!
//! Batch-convert a folder of files from one format to another: JPEG images
//! to PNG, and PDF documents to DOCX.
//!
//! Both conversions share one pipeline. Only the per-file worker differs:
//!
//! ```text
//! root folder
//!  │
//!  ├─ 1. Enumerate  matching files (case-insensitive extension), sorted
//!  ├─ 2. Name       output path from the naming policy
//!  ├─ 3. Guard      skip when the output is strictly newer than the input
//!  ├─ 4. Convert    ImageConverter (JPG → PNG) or DocumentConverter (PDF → DOCX)
//!  └─ 5. Summarise  RunSummary: converted / skipped / failed + outputs
//! ```
//!
//! One broken file never stops a batch: it is recorded as failed and the
//! driver moves on. Only setup problems (missing root, unusable output
//! folder, no pdfium) abort a run, and they do so before any file is written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchconv::{run, ImageConverter, ImageOptions, NamingPolicy, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder("photos")
//!         .recursive(true)
//!         .naming_policy(NamingPolicy::Timestamp)
//!         .build()?;
//!     let converter = ImageConverter::new(ImageOptions::new(6)?);
//!
//!     let summary = run(&config, &converter)?;
//!     println!(
//!         "{} converted, {} skipped, {} failed",
//!         summary.converted, summary.skipped, summary.failed
//!     );
//!     for failure in summary.failures() {
//!         eprintln!("{failure}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `jpg2png` and `pdf2docx` binaries (clap + anyhow + indicatif + dialoguer + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! batchconv = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDF engine
//!
//! [`DocumentConverter`] needs a pdfium shared library at runtime. It binds
//! to `$PDFIUM_LIB_PATH` when set, otherwise to the system library.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

#[cfg(feature = "cli")]
pub mod cli;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DocumentOptions, ImageOptions, NamingPolicy, PipelineConfig, PipelineConfigBuilder};
pub use convert::{is_up_to_date, plan, run};
pub use error::{BatchError, FileError, FileErrorKind};
pub use output::{ConversionResult, FileOutcome, PlannedFile, RunSummary, SkipReason};
pub use pipeline::document::DocumentConverter;
pub use pipeline::enumerate::InputFile;
pub use pipeline::image::ImageConverter;
pub use pipeline::{Converter, Format, JPG_TO_PNG, PDF_TO_DOCX};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
