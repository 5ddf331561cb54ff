//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as the driver walks the batch. The driver itself never prints;
//! a terminal progress bar, a log line per file or a JSON event stream are all
//! just different implementations of this trait.
//!
//! # Example
//!
//! ```rust
//! use batchconv::{BatchProgressCallback, FileOutcome, PipelineConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FailureCounter {
//!     failed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for FailureCounter {
//!     fn on_file_complete(&self, _index: usize, _total: usize, outcome: &FileOutcome) {
//!         if outcome.result.is_failed() {
//!             self.failed.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(FailureCounter { failed: AtomicUsize::new(0) });
//! let config = PipelineConfig::builder("photos")
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{FileOutcome, RunSummary};
use std::path::Path;
use std::sync::Arc;

/// Called by the driver as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Files are processed sequentially, so calls never
/// overlap, but the trait is `Send + Sync` so a callback can be shared with
/// other threads of the host application.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after enumeration, before the first file.
    ///
    /// # Arguments
    /// * `total_files`: number of files in the batch (may be 0)
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before the staleness check of a file.
    ///
    /// # Arguments
    /// * `index`: 1-based position in the batch
    /// * `total`: number of files in the batch
    /// * `input`: absolute path of the input
    fn on_file_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called once per file with its final result, immediately after it is
    /// known. Failures are reported here as they happen, not only in the
    /// summary.
    fn on_file_complete(&self, index: usize, total: usize, outcome: &FileOutcome) {
        let _ = (index, total, outcome);
    }

    /// Called once after every file has a result.
    fn on_batch_complete(&self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
