//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How discovered groups map to output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// One MP4 per VTS prefix, named `<prefix>.mp4`, inside `output_dir`.
    Split { output_dir: PathBuf },
    /// A single MP4 holding every group in prefix order.
    Combined { output_path: PathBuf },
}

/// One concatenate-probe-transcode cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Used for logs, the job id and the temp file prefix.
    pub label: String,
    /// Files to concatenate, in order.
    pub sources: Vec<PathBuf>,
    /// Destination MP4.
    pub output_path: PathBuf,
}

/// Outcome of one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Converted {
        output_size_bytes: u64,
        duration_ms: u64,
    },
    /// The concatenated file had no audio stream; nothing was written.
    SkippedNoAudio,
    Failed {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },
}

impl UnitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-unit entry of a [`RunReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitReport {
    pub label: String,
    pub output_path: PathBuf,
    pub outcome: UnitOutcome,
}

/// Aggregated result of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
    /// Set when the abort policy left units unprocessed.
    pub aborted: bool,
}

impl RunReport {
    pub fn converted_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::Converted { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::SkippedNoAudio))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.is_failure()).count()
    }

    /// True when no unit failed. Skipped units do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0 && !self.aborted
    }
}
