//! Destination naming: derive an output path from an input path.
//!
//! Naming is a pure function of its explicit arguments. The two inputs that
//! vary over a run are passed in rather than read from ambient state:
//!
//! * the run timestamp, captured once by the driver, so every file of a
//!   `timestamp` batch carries the same prefix;
//! * the run index, used by the `counter` policy, which the driver advances
//!   as files are converted.
//!
//! Outputs keep the sub-folder their input has below the root, so a
//! recursive batch never maps `a/x.jpg` and `b/x.jpg` onto the same file.

use crate::config::NamingPolicy;
use chrono::{DateTime, TimeZone};
use std::ffi::{OsStr, OsString};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// `strftime` pattern of the `timestamp` policy prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Fallback prefix for `batch-name` when the root has no final component
/// (e.g. `/`).
const DEFAULT_BATCH_NAME: &str = "batch";

/// Run-wide inputs of the namer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingContext {
    /// Folder the batch was enumerated from (absolute).
    pub root: PathBuf,
    /// Folder outputs are placed under.
    pub output_dir: PathBuf,
    /// Extension of produced files, without the dot.
    pub target_extension: String,
    /// Pre-formatted `YYYYMMDD_HHMMSS` run timestamp.
    pub timestamp: String,
}

impl NamingContext {
    pub fn new<Tz>(
        root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        target_extension: impl Into<String>,
        started_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
            target_extension: target_extension.into(),
            timestamp: started_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    fn batch_name(&self) -> &OsStr {
        self.root
            .file_name()
            .unwrap_or_else(|| OsStr::new(DEFAULT_BATCH_NAME))
    }
}

/// Compute the output path for `input`.
///
/// `run_index` is 1-based and only read by [`NamingPolicy::Counter`].
/// The stem is kept byte for byte, so names that are not valid UTF-8
/// survive unchanged.
pub fn name(input: &Path, policy: NamingPolicy, ctx: &NamingContext, run_index: usize) -> PathBuf {
    let mut file_name = OsString::new();
    match policy {
        NamingPolicy::None => {}
        NamingPolicy::Timestamp => file_name.push(format!("{}_", ctx.timestamp)),
        NamingPolicy::Counter => file_name.push(format!("converted_{:03}_", run_index)),
        NamingPolicy::BatchName => {
            file_name.push(ctx.batch_name());
            file_name.push("_");
        }
    }
    file_name.push(input.file_stem().unwrap_or_default());
    file_name.push(".");
    file_name.push(&ctx.target_extension);

    let relative_dir = input
        .parent()
        .and_then(|parent| parent.strip_prefix(&ctx.root).ok())
        .unwrap_or_else(|| Path::new(""));

    ctx.output_dir.join(relative_dir).join(file_name)
}
