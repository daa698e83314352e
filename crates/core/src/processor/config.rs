//! Configuration for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::AspectRatio;

/// What to do with the remaining units after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Process every unit and report all failures at the end.
    #[default]
    Continue,
    /// Stop at the first failed unit.
    Abort,
}

/// Configuration for the processing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Directory receiving split-mode outputs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory for concatenated intermediates. Defaults to the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Probe the display aspect ratio when no override is given.
    #[serde(default = "default_detect_aspect")]
    pub detect_aspect: bool,

    /// Aspect ratio forced on every output.
    #[serde(default)]
    pub aspect: Option<AspectRatio>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_detect_aspect() -> bool {
    true
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            temp_dir: None,
            failure_policy: FailurePolicy::default(),
            detect_aspect: default_detect_aspect(),
            aspect: None,
        }
    }
}

impl ProcessorConfig {
    /// Temp directory actually used for intermediates.
    pub fn effective_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    /// Sets the split-mode output directory.
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Forces an aspect ratio, which also skips detection.
    pub fn with_aspect(mut self, aspect: AspectRatio) -> Self {
        self.aspect = Some(aspect);
        self
    }
}
