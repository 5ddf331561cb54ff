//! Configuration types for a batch conversion run.
//!
//! Everything the driver needs to know about *which* files to convert and
//! *where* to put them lives in [`PipelineConfig`], built via its
//! [`PipelineConfigBuilder`]. Format-specific knobs (PNG compression, PDF
//! password) live on the worker options, [`ImageOptions`] and
//! [`DocumentOptions`], because only one worker ever reads them.

use crate::error::BatchError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use batchconv::{NamingPolicy, PipelineConfig};
///
/// let config = PipelineConfig::builder("photos")
///     .output_dir("converted")
///     .recursive(true)
///     .naming_policy(NamingPolicy::Counter)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_dir(), std::path::Path::new("converted"));
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Folder scanned for input files.
    pub root: PathBuf,

    /// Folder receiving the converted files. `None` means "next to the
    /// inputs", i.e. the root itself.
    pub output_dir: Option<PathBuf>,

    /// Descend into sub-folders of `root`. Default: false.
    pub recursive: bool,

    /// How output file names are derived from input names. Default: `none`.
    pub naming_policy: NamingPolicy,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("root", &self.root)
            .field("output_dir", &self.output_dir)
            .field("recursive", &self.recursive)
            .field("naming_policy", &self.naming_policy)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder scanning `root`.
    pub fn builder(root: impl Into<PathBuf>) -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: PipelineConfig {
                root: root.into(),
                output_dir: None,
                recursive: false,
                naming_policy: NamingPolicy::default(),
                progress_callback: None,
            },
        }
    }

    /// The effective output folder: the configured one, or the root.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.root)
    }
}

/// Builder for [`PipelineConfig`].
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn recursive(mut self, v: bool) -> Self {
        self.config.recursive = v;
        self
    }

    pub fn naming_policy(mut self, policy: NamingPolicy) -> Self {
        self.config.naming_policy = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Only cheap, syntactic checks happen here; whether `root` is actually
    /// a directory is decided by the enumerator at run time.
    pub fn build(self) -> Result<PipelineConfig, BatchError> {
        let c = &self.config;
        if c.root.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("root folder must not be empty".into()));
        }
        if matches!(&c.output_dir, Some(d) if d.as_os_str().is_empty()) {
            return Err(BatchError::InvalidConfig(
                "output folder must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How an output file name is derived from its input.
///
/// | Policy | `holiday/beach.jpg` becomes |
/// |--------|-----------------------------|
/// | `none` | `beach.png` |
/// | `timestamp` | `20260101_093000_beach.png` |
/// | `counter` | `converted_001_beach.png` |
/// | `batch-name` | `holiday_beach.png` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Same stem, new extension. (default)
    #[default]
    None,
    /// Run start time (`YYYYMMDD_HHMMSS`) prefixed to the stem.
    Timestamp,
    /// `converted_NNN_` prefix, NNN being the 1-based run index.
    Counter,
    /// The root folder's own name prefixed to the stem.
    BatchName,
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NamingPolicy::None => "none",
            NamingPolicy::Timestamp => "timestamp",
            NamingPolicy::Counter => "counter",
            NamingPolicy::BatchName => "batch-name",
        };
        f.write_str(s)
    }
}

// ── Worker options ───────────────────────────────────────────────────────

/// Settings for the JPG → PNG worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    compression_level: u8,
}

impl ImageOptions {
    /// Highest accepted PNG compression level.
    pub const MAX_COMPRESSION: u8 = 9;

    /// PNG compression level 0–9: 0 is fastest with the largest files,
    /// 9 is slowest with the smallest. PNG is lossless, so the level never
    /// affects pixels.
    pub fn new(compression_level: u8) -> Result<Self, BatchError> {
        if compression_level > Self::MAX_COMPRESSION {
            return Err(BatchError::InvalidConfig(format!(
                "PNG compression level must be 0–9, got {compression_level}"
            )));
        }
        Ok(Self { compression_level })
    }

    pub fn compression_level(&self) -> u8 {
        self.compression_level
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            compression_level: Self::MAX_COMPRESSION,
        }
    }
}

/// Settings for the PDF → DOCX worker.
#[derive(Clone, Default)]
pub struct DocumentOptions {
    /// User password applied to every encrypted PDF in the batch.
    pub password: Option<String>,
}

impl fmt::Debug for DocumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentOptions")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_defaults_to_root() {
        let config = PipelineConfig::builder("/photos").build().unwrap();
        assert_eq!(config.output_dir(), Path::new("/photos"));
        assert!(!config.recursive);
        assert_eq!(config.naming_policy, NamingPolicy::None);
    }

    #[test]
    fn empty_root_is_rejected() {
        let err = PipelineConfig::builder("").build().unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn empty_output_dir_is_rejected() {
        let err = PipelineConfig::builder("/photos")
            .output_dir("")
            .build()
            .unwrap_err();
        assert!(matches!(err, BatchError::InvalidConfig(_)));
    }

    #[test]
    fn compression_level_range() {
        assert!(ImageOptions::new(0).is_ok());
        assert_eq!(ImageOptions::new(9).unwrap().compression_level(), 9);
        assert!(ImageOptions::new(10).is_err());
        assert_eq!(ImageOptions::default().compression_level(), 9);
    }

    #[test]
    fn naming_policy_serde_matches_display() {
        for policy in [
            NamingPolicy::None,
            NamingPolicy::Timestamp,
            NamingPolicy::Counter,
            NamingPolicy::BatchName,
        ] {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{policy}\""));
        }
    }

    #[test]
    fn debug_redacts_password() {
        let opts = DocumentOptions {
            password: Some("hunter2".into()),
        };
        let dbg = format!("{opts:?}");
        assert!(!dbg.contains("hunter2"));
    }
}
