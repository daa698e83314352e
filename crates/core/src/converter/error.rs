//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or transcoding.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The prober reported no audio stream.
    #[error("No audio streams found in {path}")]
    NoAudioStream { path: PathBuf },

    /// FFprobe exited unsuccessfully.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// FFmpeg exited unsuccessfully.
    #[error("Transcode failed: {reason}")]
    TranscodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// FFmpeg exited cleanly but left no output behind.
    #[error("Output file not created: {path}")]
    OutputMissing { path: PathBuf },

    /// Transcode timed out.
    #[error("Transcode timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Aspect ratio string could not be understood.
    #[error("Invalid aspect ratio: {value} (expected e.g. 16:9, 4:3 or 1.85)")]
    InvalidAspectRatio { value: String },

    /// Failed to parse FFprobe output.
    #[error("Failed to parse probe output: {reason}")]
    ParseError { reason: String },

    /// I/O error while talking to a subprocess.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new transcode failed error with stderr output.
    pub fn transcode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::TranscodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new probe failed error with stderr output.
    pub fn probe_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Diagnostic output captured from the failing tool, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ProbeFailed { stderr, .. } | Self::TranscodeFailed { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }

    /// Whether a required external tool is missing.
    pub fn is_missing_tool(&self) -> bool {
        matches!(
            self,
            Self::FfmpegNotFound { .. } | Self::FfprobeNotFound { .. }
        )
    }
}
