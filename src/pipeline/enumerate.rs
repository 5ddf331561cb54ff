//! Source enumeration: find the candidate inputs of a batch.
//!
//! Extensions are compared case-insensitively, so `a.jpg`, `b.JPG` and
//! `c.Jpeg` all match `["jpg", "jpeg"]`, and every file appears once no
//! matter how many spellings it matches. The result is sorted by path so the
//! batch order, and with it the `counter` naming policy, is deterministic.

use crate::error::BatchError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Absolute path; the file's identity within a batch.
    pub path: PathBuf,
    /// Modification time captured at enumeration.
    pub modified: SystemTime,
}

/// List the files under `root` whose extension is in `extensions`.
///
/// `extensions` are lowercase, without the leading dot. With `recursive`
/// false only direct children of `root` are considered.
///
/// # Errors
/// [`BatchError::NotADirectory`] when `root` is missing or not a folder,
/// [`BatchError::Enumeration`] when the root itself cannot be listed.
/// Unreadable entries further down are logged and skipped.
pub fn enumerate(
    root: &Path,
    recursive: bool,
    extensions: &[&str],
) -> Result<Vec<InputFile>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let root = std::path::absolute(root).map_err(|_| BatchError::NotADirectory {
        path: root.to_path_buf(),
    })?;

    let mut walker = WalkDir::new(&root).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(BatchError::Enumeration {
                    path: root.clone(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !has_extension(path, extensions) || !path.is_file() {
            continue;
        }

        match path.metadata().and_then(|m| m.modified()) {
            Ok(modified) => files.push(InputFile {
                path: path.to_path_buf(),
                modified,
            }),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    debug!("Enumerated {} file(s) under {}", files.len(), root.display());
    Ok(files)
}

/// Case-insensitive extension match.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}
