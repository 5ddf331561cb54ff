//! Command-line front end shared by the `jpg2png` and `pdf2docx` binaries.
//!
//! Each binary only adds its format-specific flags and a constructor for its
//! worker; argument parsing, logging, the folder prompt, progress display and
//! the final report all live here.

use crate::config::{NamingPolicy, PipelineConfig};
use crate::convert::{plan, run};
use crate::error::BatchError;
use crate::output::{ConversionResult, FileOutcome, RunSummary};
use crate::pipeline::{Converter, Format};
use crate::progress::{BatchProgressCallback, ProgressCallback};
use anyhow::{bail, Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Number of produced files listed by name in the summary.
const LISTED_OUTPUTS: usize = 3;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Arguments ────────────────────────────────────────────────────────────────

/// Flags common to every converter binary.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Folder to scan. Asked for interactively when omitted.
    #[arg(env = "BATCHCONV_ROOT")]
    pub root: Option<PathBuf>,

    /// Write converted files here instead of next to the inputs.
    #[arg(short, long, env = "BATCHCONV_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Also convert files in sub-folders.
    #[arg(short, long, env = "BATCHCONV_RECURSIVE")]
    pub recursive: bool,

    /// How output names are derived from input names.
    #[arg(
        short = 'p',
        long = "naming-policy",
        alias = "prefix",
        env = "BATCHCONV_NAMING_POLICY",
        value_enum,
        default_value = "none"
    )]
    pub naming_policy: NamingPolicyArg,

    /// Print the planned `input -> output` mapping and exit without writing.
    #[arg(short, long, env = "BATCHCONV_LIST_ONLY")]
    pub list_only: bool,

    /// Ask for the folder even when ROOT is given.
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the run summary (or the planned mapping) as JSON.
    #[arg(long, env = "BATCHCONV_JSON")]
    pub json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "BATCHCONV_NO_PROGRESS")]
    pub no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BATCHCONV_VERBOSE")]
    pub verbose: bool,

    /// Suppress all output except errors.
    #[arg(long, env = "BATCHCONV_QUIET")]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingPolicyArg {
    None,
    Timestamp,
    Counter,
    #[value(alias = "batch")]
    BatchName,
}

impl From<NamingPolicyArg> for NamingPolicy {
    fn from(v: NamingPolicyArg) -> Self {
        match v {
            NamingPolicyArg::None => NamingPolicy::None,
            NamingPolicyArg::Timestamp => NamingPolicy::Timestamp,
            NamingPolicyArg::Counter => NamingPolicy::Counter,
            NamingPolicyArg::BatchName => NamingPolicy::BatchName,
        }
    }
}

// ── Logging ──────────────────────────────────────────────────────────────────

/// Install the stderr subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(args: &CommonArgs) {
    // Outside `--json` the per-file lines already report failures, so
    // library INFO/WARN would only repeat them.
    let filter = if args.verbose {
        "debug"
    } else if args.json {
        "info"
    } else {
        "error"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();
}

// ── Progress display ─────────────────────────────────────────────────────────

/// Terminal progress: a bar at the bottom plus one line per finished file.
///
/// Without a bar (`--no-progress`, or stderr not a terminal) the lines go
/// straight to stderr, so failures are always reported as they happen.
/// With `--quiet` only the failure lines are printed.
struct CliProgress {
    bar: Option<ProgressBar>,
    label: &'static str,
    failures_only: bool,
}

impl CliProgress {
    fn new(label: &'static str, draw_bar: bool, failures_only: bool) -> Arc<Self> {
        let bar = (draw_bar && io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_prefix("Scanning");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self {
            bar,
            label,
            failures_only,
        })
    }

    fn say(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }

    /// The line printed for a finished file, if any.
    fn outcome_line(&self, index: usize, total: usize, outcome: &FileOutcome) -> Option<String> {
        let name = display_name(&outcome.input);
        let line = match &outcome.result {
            ConversionResult::Failed { error } => format!(
                "  {} {:>3}/{:<3}  {}  {}",
                red("✗"),
                index,
                total,
                name,
                red(&truncate(&format!("{}: {}", error.kind, error.message), 80)),
            ),
            _ if self.failures_only => return None,
            ConversionResult::Converted { output } => format!(
                "  {} {:>3}/{:<3}  {}  {}",
                green("✓"),
                index,
                total,
                name,
                dim(&format!("→ {}", display_name(output))),
            ),
            ConversionResult::Skipped { reason, .. } => format!(
                "  {} {:>3}/{:<3}  {}  {}",
                dim("="),
                index,
                total,
                name,
                dim(&reason.to_string()),
            ),
        };
        Some(line)
    }
}

impl BatchProgressCallback for CliProgress {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(bar) = &self.bar {
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
            bar.set_length(total_files as u64);
            bar.set_style(style);
            bar.set_prefix("Converting");
        }
        if total_files > 0 && !self.failures_only {
            self.say(format!(
                "{} {}",
                cyan("◆"),
                bold(&format!("Found {total_files} {} file(s)", self.label))
            ));
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(display_name(input));
        }
    }

    fn on_file_complete(&self, index: usize, total: usize, outcome: &FileOutcome) {
        if let Some(line) = self.outcome_line(index, total, outcome) {
            self.say(line);
        }
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _summary: &RunSummary) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars - 1).collect();
        format!("{head}\u{2026}")
    } else {
        s.to_string()
    }
}

// ── Run flow ─────────────────────────────────────────────────────────────────

/// Parse-independent entry point used by both binaries.
///
/// `make_converter` is only called once there is something to convert, so
/// list-only mode, a bad root and an empty folder never need e.g. a pdfium
/// library.
pub fn run_batch<C, F>(args: &CommonArgs, format: &'static Format, make_converter: F) -> Result<()>
where
    C: Converter,
    F: FnOnce() -> Result<C, BatchError>,
{
    // ── Resolve the root folder ──────────────────────────────────────────
    let Some(root) = resolve_root(args, format)? else {
        if !args.quiet {
            println!("Cancelled.");
        }
        return Ok(());
    };

    // ── Plan the batch ───────────────────────────────────────────────────
    // Enumerating first reports a bad root or an empty folder before the
    // worker (and e.g. pdfium) is set up.
    let mut config = build_config(args, root, None)?;
    let planned = plan(&config, format).context("Failed to list files")?;

    if args.list_only {
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&planned).context("Failed to serialise file list")?
            );
        } else if planned.is_empty() {
            println!("No {} files found in {}", format.label, config.root.display());
        } else {
            println!("Found {} {} file(s):", planned.len(), format.label);
            for file in &planned {
                println!("  {} -> {}", file.input.display(), file.output.display());
            }
        }
        return Ok(());
    }

    if planned.is_empty() {
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&RunSummary::default())
                    .context("Failed to serialise summary")?
            );
        } else if !args.quiet {
            println!("No {} files found in {}", format.label, config.root.display());
        }
        return Ok(());
    }

    // ── Convert ──────────────────────────────────────────────────────────
    let converter = make_converter().context("Cannot start conversion")?;
    config.progress_callback = (!args.json).then(|| {
        CliProgress::new(format.label, !args.no_progress && !args.quiet, args.quiet)
            as ProgressCallback
    });

    let summary = run(&config, &converter).context("Batch conversion failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !args.quiet {
        print_summary(&summary, format, &config);
    }

    Ok(())
}

/// The folder to convert, or `None` when the user cancelled the prompt.
fn resolve_root(args: &CommonArgs, format: &Format) -> Result<Option<PathBuf>> {
    if let (Some(root), false) = (&args.root, args.interactive) {
        return Ok(Some(root.clone()));
    }

    if !io::stdin().is_terminal() {
        match &args.root {
            Some(root) => return Ok(Some(root.clone())),
            None => bail!("No folder given and no terminal to ask on; pass ROOT"),
        }
    }

    let mut prompt = Input::<String>::new()
        .with_prompt(format!(
            "Folder containing {} files (empty to cancel)",
            format.label
        ))
        .allow_empty(true);
    if let Some(root) = &args.root {
        prompt = prompt.with_initial_text(root.display().to_string());
    }
    let answer = prompt.interact_text().context("Failed to read folder")?;

    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}

/// Map CLI args to `PipelineConfig`.
fn build_config(
    args: &CommonArgs,
    root: PathBuf,
    progress: Option<ProgressCallback>,
) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder(root)
        .recursive(args.recursive)
        .naming_policy(args.naming_policy.into());
    if let Some(dir) = &args.output {
        builder = builder.output_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

fn print_summary(summary: &RunSummary, format: &Format, config: &PipelineConfig) {
    if summary.total() == 0 {
        println!("No {} files found in {}", format.label, config.root.display());
        return;
    }

    let mark = if summary.failed == 0 {
        green("✔")
    } else if summary.failed == summary.total() {
        red("✘")
    } else {
        cyan("⚠")
    };
    println!(
        "{}  {} {} → {} batch finished in {}ms",
        mark,
        summary.total(),
        format.label,
        format.target_extension.to_uppercase(),
        summary.duration_ms
    );
    println!("   Converted: {}", bold(&summary.converted.to_string()));
    println!("   Skipped:   {}", summary.skipped);
    println!(
        "   Failed:    {}",
        if summary.failed == 0 {
            summary.failed.to_string()
        } else {
            red(&summary.failed.to_string())
        }
    );
    println!("   Output:    {}", config.output_dir().display());

    for line in output_listing(&summary.outputs) {
        println!("     {line}");
    }
    for failure in summary.failures() {
        println!("   {} {}", red("✗"), failure);
    }
}

/// The first few produced files by name, then "... and N more".
fn output_listing(outputs: &[PathBuf]) -> Vec<String> {
    let mut lines: Vec<String> = outputs
        .iter()
        .take(LISTED_OUTPUTS)
        .map(|p| display_name(p))
        .collect();
    if outputs.len() > LISTED_OUTPUTS {
        lines.push(format!("... and {} more", outputs.len() - LISTED_OUTPUTS));
    }
    lines
}
