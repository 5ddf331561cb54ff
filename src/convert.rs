//! Batch driver: enumerate → name → staleness guard → convert → summarise.
//!
//! Files are processed one at a time, in enumeration order, on the calling
//! thread. A failing file is recorded and the loop moves on; only setup
//! problems (bad root, unusable output folder) abort the run, and they do so
//! before the first file is touched.

use crate::config::PipelineConfig;
use crate::error::{BatchError, FileError, FileErrorKind};
use crate::output::{ConversionResult, FileOutcome, PlannedFile, RunSummary, SkipReason};
use crate::pipeline::enumerate::{enumerate, InputFile};
use crate::pipeline::naming::{self, NamingContext};
use crate::pipeline::{Converter, Format};
use crate::progress::{BatchProgressCallback, NoopProgressCallback};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert every matching file under `config.root`.
///
/// # Returns
/// `Ok(RunSummary)` once every enumerated file has a result, even if some
/// (or all) of them failed. An empty batch yields an empty summary.
///
/// # Errors
/// Returns `Err(BatchError)` only for setup failures:
/// - root folder missing or not a directory
/// - root folder not listable
/// - output folder not creatable
pub fn run<C: Converter + ?Sized>(
    config: &PipelineConfig,
    converter: &C,
) -> Result<RunSummary, BatchError> {
    let started = Instant::now();
    let format = converter.format();
    let noop = NoopProgressCallback;
    let cb: &dyn BatchProgressCallback = config.progress_callback.as_deref().unwrap_or(&noop);

    info!(
        "Starting batch: {} ({} → {}, recursive={}, naming={})",
        config.root.display(),
        format.label,
        format.target_extension,
        config.recursive,
        config.naming_policy
    );

    // ── Step 1: Enumerate inputs ─────────────────────────────────────────
    let files = enumerate(&config.root, config.recursive, format.source_extensions)?;
    let total = files.len();
    info!("Found {} {} file(s)", total, format.label);

    // ── Step 2: Prepare output folder ────────────────────────────────────
    // An empty batch writes nothing, not even the folder.
    let output_dir = config.output_dir();
    if total > 0 {
        fs::create_dir_all(output_dir).map_err(|e| BatchError::OutputDirUnavailable {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
    }
    let ctx = naming_context(config, format)?;

    cb.on_batch_start(total);

    // ── Step 3: Convert, one file at a time ──────────────────────────────
    let mut summary = RunSummary::default();
    for (i, input) in files.iter().enumerate() {
        let index = i + 1;
        cb.on_file_start(index, total, &input.path);

        // `counter` numbers the files actually written in this run.
        let run_index = summary.converted + 1;
        let output = naming::name(&input.path, config.naming_policy, &ctx, run_index);
        let result = process_file(converter, input, output);

        match &result {
            ConversionResult::Converted { output } => {
                debug!("[{}/{}] {} → {}", index, total, input.path.display(), output.display())
            }
            ConversionResult::Skipped { output, reason } => {
                debug!("[{}/{}] skipped {}: {}", index, total, output.display(), reason)
            }
            ConversionResult::Failed { error } => warn!("[{}/{}] {}", index, total, error),
        }

        let outcome = FileOutcome {
            input: input.path.clone(),
            result,
        };
        cb.on_file_complete(index, total, &outcome);
        summary.record(outcome);
    }

    // ── Step 4: Summarise ────────────────────────────────────────────────
    summary.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "Batch complete: {} converted, {} skipped, {} failed in {}ms",
        summary.converted, summary.skipped, summary.failed, summary.duration_ms
    );
    cb.on_batch_complete(&summary);

    Ok(summary)
}

/// Dry run: the `input -> output` mapping [`run`] would use.
///
/// Nothing is written, not even the output folder. Under the `counter`
/// policy every file is assumed to convert, so indices follow batch order.
pub fn plan(config: &PipelineConfig, format: &Format) -> Result<Vec<PlannedFile>, BatchError> {
    let files = enumerate(&config.root, config.recursive, format.source_extensions)?;
    let ctx = naming_context(config, format)?;

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(i, file)| PlannedFile {
            output: naming::name(&file.path, config.naming_policy, &ctx, i + 1),
            input: file.path,
        })
        .collect())
}

/// True when `output` exists and is strictly newer than `input`.
///
/// Equal timestamps count as stale, so coarse-resolution filesystems
/// re-convert rather than risk keeping an outdated file.
pub fn is_up_to_date(input: &InputFile, output: &Path) -> bool {
    fs::metadata(output)
        .and_then(|m| m.modified())
        .is_ok_and(|out_mtime| out_mtime > input.modified)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn process_file<C: Converter + ?Sized>(
    converter: &C,
    input: &InputFile,
    output: PathBuf,
) -> ConversionResult {
    if is_up_to_date(input, &output) {
        return ConversionResult::Skipped {
            output,
            reason: SkipReason::AlreadyUpToDate,
        };
    }

    if let Some(parent) = output.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return ConversionResult::Failed {
                error: FileError::io(&output, FileErrorKind::Write, e),
            };
        }
    }

    match converter.convert(&input.path, &output) {
        Ok(()) => ConversionResult::Converted { output },
        Err(error) => ConversionResult::Failed { error },
    }
}

/// Absolute root and output folder, plus the run timestamp captured once.
fn naming_context(config: &PipelineConfig, format: &Format) -> Result<NamingContext, BatchError> {
    let root = std::path::absolute(&config.root).map_err(|_| BatchError::NotADirectory {
        path: config.root.clone(),
    })?;
    let output_dir = config.output_dir();
    let output_dir =
        std::path::absolute(output_dir).map_err(|e| BatchError::OutputDirUnavailable {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    Ok(NamingContext::new(
        root,
        output_dir,
        format.target_extension,
        &Local::now(),
    ))
}
