//! Result types produced by a batch run.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a file was not handed to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The output exists and is strictly newer than the input.
    AlreadyUpToDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyUpToDate => f.write_str("already up to date"),
        }
    }
}

/// The result for exactly one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResult {
    Converted { output: PathBuf },
    Skipped { output: PathBuf, reason: SkipReason },
    Failed { error: FileError },
}

impl ConversionResult {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionResult::Converted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ConversionResult::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConversionResult::Failed { .. })
    }
}

/// An input file paired with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: ConversionResult,
}

/// A planned `input -> output` mapping, as printed by list-only mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Aggregate report of one run.
///
/// `outcomes` holds one entry per enumerated file, in enumeration order, so
/// `outcomes.len() == converted + skipped + failed` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Outputs written in this run, in processing order.
    pub outputs: Vec<PathBuf>,
    pub outcomes: Vec<FileOutcome>,
    pub duration_ms: u64,
}

impl RunSummary {
    /// Total number of files in the batch.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Record one outcome, keeping the counters consistent with `outcomes`.
    pub(crate) fn record(&mut self, outcome: FileOutcome) {
        match &outcome.result {
            ConversionResult::Converted { output } => {
                self.converted += 1;
                self.outputs.push(output.clone());
            }
            ConversionResult::Skipped { .. } => self.skipped += 1,
            ConversionResult::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// The failed outcomes only.
    pub fn failures(&self) -> impl Iterator<Item = &FileError> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            ConversionResult::Failed { error } => Some(error),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;

    fn outcome(name: &str, result: ConversionResult) -> FileOutcome {
        FileOutcome {
            input: PathBuf::from(name),
            result,
        }
    }

    #[test]
    fn record_keeps_counts_consistent() {
        let mut summary = RunSummary::default();
        summary.record(outcome(
            "a.jpg",
            ConversionResult::Converted {
                output: "a.png".into(),
            },
        ));
        summary.record(outcome(
            "b.jpg",
            ConversionResult::Skipped {
                output: "b.png".into(),
                reason: SkipReason::AlreadyUpToDate,
            },
        ));
        summary.record(outcome(
            "c.jpg",
            ConversionResult::Failed {
                error: FileError::new("c.jpg", FileErrorKind::Decode, "truncated"),
            },
        ));

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.outputs, vec![PathBuf::from("a.png")]);
        assert_eq!(summary.failures().count(), 1);
    }

    #[test]
    fn summary_json_round_trip() {
        let mut summary = RunSummary::default();
        summary.record(outcome(
            "a.jpg",
            ConversionResult::Converted {
                output: "a.png".into(),
            },
        ));
        let json = serde_json::to_string_pretty(&summary).expect("serialise");
        assert!(json.contains("\"status\": \"converted\""), "got: {json}");

        let back: RunSummary = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, summary);
    }
}
