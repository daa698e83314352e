//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConverterError;

/// Index of a stream inside the probed container, as reported by ffprobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioStreamIndex(pub u32);

impl AudioStreamIndex {
    /// The `-map` specifier selecting this stream from the first input.
    pub fn map_specifier(&self) -> String {
        format!("0:{}", self.0)
    }
}

impl fmt::Display for AudioStreamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display aspect ratio handed to ffmpeg's `-aspect`.
///
/// Accepts `W:H`, `W/H` or a plain decimal (`1.85`). Every component must be
/// a positive number, so ffprobe's `0:1` placeholder is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio(String);

impl AspectRatio {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AspectRatio {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let invalid = || ConverterError::InvalidAspectRatio {
            value: s.to_string(),
        };

        let positive = |part: &str| {
            !part.is_empty()
                && part.chars().all(|c| c.is_ascii_digit() || c == '.')
                && part.parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
        };

        let mut parts = value.splitn(2, [':', '/']);
        let first = parts.next().unwrap_or_default();
        if !positive(first) {
            return Err(invalid());
        }
        if let Some(second) = parts.next() {
            if !positive(second) {
                return Err(invalid());
            }
        }

        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ConverterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.0
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single transcode request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeJob {
    /// Identifier used in logs and progress samples.
    pub job_id: String,
    /// Concatenated VOB to read.
    pub input_path: PathBuf,
    /// MP4 to write (overwritten if present).
    pub output_path: PathBuf,
    /// Audio stream mapped next to `0:v:0`.
    pub audio_stream: AudioStreamIndex,
    /// Optional `-aspect` value.
    pub aspect: Option<AspectRatio>,
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeResult {
    pub job_id: String,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    /// Wall-clock time spent in ffmpeg.
    pub duration_ms: u64,
}

/// Progress sample parsed from `-progress pipe:2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeProgress {
    pub job_id: String,
    /// Seconds of output encoded so far.
    pub time_secs: f64,
    /// Encoding speed, e.g. "2.5x".
    pub speed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_stream_map_specifier() {
        assert_eq!(AudioStreamIndex(1).map_specifier(), "0:1");
        assert_eq!(AudioStreamIndex(12).to_string(), "12");
    }

    #[test]
    fn test_aspect_ratio_accepts_common_forms() {
        for value in ["16:9", "4:3", "1.85", "2.35:1", "16/9", " 4:3 "] {
            let parsed: AspectRatio = value.parse().unwrap();
            assert_eq!(parsed.as_str(), value.trim());
        }
    }

    #[test]
    fn test_aspect_ratio_rejects_garbage() {
        for value in ["", "N/A", "0:1", "16:", ":9", "abc", "16:9:1", "-4:3"] {
            assert!(
                value.parse::<AspectRatio>().is_err(),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_aspect_ratio_serde() {
        let aspect: AspectRatio = serde_json::from_str(r#""16:9""#).unwrap();
        assert_eq!(aspect.as_str(), "16:9");
        assert!(serde_json::from_str::<AspectRatio>(r#""wide""#).is_err());
    }
}
