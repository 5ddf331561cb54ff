//! Pipeline stages for batch conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own and the two converters share everything except their worker.
//!
//! ## Data Flow
//!
//! ```text
//! enumerate ──▶ naming ──▶ (staleness guard) ──▶ worker ──▶ summary
//!  (walkdir)    (policy)     (mtime compare)     (image / document)
//! ```
//!
//! 1. [`enumerate`]: list candidate inputs under the root, sorted and
//!    deduplicated
//! 2. [`naming`]: derive each output path from the naming policy
//! 3. [`image`] / [`document`]: the format-specific [`Converter`]s; both
//!    write through [`atomic`] so a crash never leaves a truncated output
//!
//! The driver that strings these together lives in [`crate::convert`].

pub mod atomic;
pub mod document;
pub mod enumerate;
pub mod image;
pub mod naming;

use crate::error::FileError;
use std::path::Path;

/// Static description of what a converter consumes and produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Human label for the inputs, e.g. `"JPG"`.
    pub label: &'static str,
    /// Accepted input extensions, lowercase and without the dot.
    pub source_extensions: &'static [&'static str],
    /// Extension of the produced files, without the dot.
    pub target_extension: &'static str,
}

/// JPEG images re-encoded as PNG.
pub const JPG_TO_PNG: Format = Format {
    label: "JPG",
    source_extensions: &["jpg", "jpeg"],
    target_extension: "png",
};

/// PDF documents whose text is extracted into DOCX.
pub const PDF_TO_DOCX: Format = Format {
    label: "PDF",
    source_extensions: &["pdf"],
    target_extension: "docx",
};

/// A format-specific conversion worker.
///
/// Implementations must not print; every failure is returned as a
/// [`FileError`] and reported by the driver.
pub trait Converter {
    /// What this worker reads and writes.
    fn format(&self) -> &'static Format;

    /// Convert `input` into `output`. `output`'s parent folder exists.
    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError>;
}

impl<C: Converter + ?Sized> Converter for &C {
    fn format(&self) -> &'static Format {
        (**self).format()
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError> {
        (**self).convert(input, output)
    }
}
