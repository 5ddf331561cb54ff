//! Error types for the batchconv library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`]: **Fatal**: the batch cannot start at all (root folder
//!   missing, output folder not creatable, PDF engine unavailable). Returned
//!   as `Err(BatchError)` from [`crate::convert::run`] and
//!   [`crate::convert::plan`] before any file is touched.
//!
//! * [`FileError`]: **Non-fatal**: one file could not be converted (corrupt
//!   input, codec failure, permission problem). Stored inside
//!   [`crate::output::ConversionResult::Failed`] so one bad file never aborts
//!   the rest of the batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// All fatal errors returned by the batchconv library.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Setup errors ──────────────────────────────────────────────────────
    /// The root folder does not exist or is not a directory.
    #[error("'{path}' is not a valid directory")]
    NotADirectory { path: PathBuf },

    /// The root folder exists but its entries could not be listed.
    #[error("Failed to list '{path}': {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The output folder could not be created.
    #[error("Cannot create output folder '{path}': {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n\
Pre-built libraries are available from\n\
https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),
}

/// What went wrong with a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileErrorKind {
    /// The input could not be opened or read.
    Read,
    /// The process lacks permission on the input or output.
    PermissionDenied,
    /// The input is not a decodable image.
    Decode,
    /// Encoding the target format failed.
    Encode,
    /// The input document could not be opened or its text extracted.
    Extract,
    /// The output could not be written or moved into place.
    Write,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileErrorKind::Read => "read failed",
            FileErrorKind::PermissionDenied => "permission denied",
            FileErrorKind::Decode => "decode failed",
            FileErrorKind::Encode => "encode failed",
            FileErrorKind::Extract => "text extraction failed",
            FileErrorKind::Write => "write failed",
        };
        f.write_str(s)
    }
}

/// A non-fatal error for a single file.
///
/// Produced by a [`crate::pipeline::Converter`] and carried to the driver,
/// which records it and moves on to the next file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}: {kind}: {message}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    pub kind: FileErrorKind,
    pub message: String,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, kind: FileErrorKind, message: impl fmt::Display) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.to_string(),
        }
    }

    /// Classify an I/O error, promoting permission problems to their own kind.
    pub fn io(path: &Path, fallback: FileErrorKind, err: std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::PermissionDenied {
            FileErrorKind::PermissionDenied
        } else {
            fallback
        };
        Self::new(path, kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_directory_display() {
        let e = BatchError::NotADirectory {
            path: PathBuf::from("/photos"),
        };
        assert_eq!(e.to_string(), "'/photos' is not a valid directory");
    }

    #[test]
    fn file_error_display_names_path_and_kind() {
        let e = FileError::new("/photos/a.jpg", FileErrorKind::Decode, "bad SOI marker");
        let msg = e.to_string();
        assert!(msg.contains("/photos/a.jpg"), "got: {msg}");
        assert!(msg.contains("decode failed"), "got: {msg}");
        assert!(msg.contains("bad SOI marker"), "got: {msg}");
    }

    #[test]
    fn io_permission_denied_is_promoted() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e = FileError::io(Path::new("x.pdf"), FileErrorKind::Read, err);
        assert_eq!(e.kind, FileErrorKind::PermissionDenied);

        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e = FileError::io(Path::new("x.pdf"), FileErrorKind::Read, err);
        assert_eq!(e.kind, FileErrorKind::Read);
    }

    #[test]
    fn file_error_serialises_kind_in_kebab_case() {
        let e = FileError::new("a.jpg", FileErrorKind::PermissionDenied, "denied");
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("\"permission-denied\""), "got: {json}");
    }
}
