//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc;

use super::error::ConverterError;
use super::types::{AspectRatio, AudioStreamIndex, TranscodeJob, TranscodeProgress, TranscodeResult};

/// Something that can inspect a concatenated VOB and transcode it to MP4.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Index of the first audio stream in the file.
    ///
    /// Returns [`ConverterError::NoAudioStream`] when the file has none.
    async fn first_audio_stream(&self, path: &Path) -> Result<AudioStreamIndex, ConverterError>;

    /// Display aspect ratio of the first video stream, if known.
    async fn display_aspect_ratio(&self, path: &Path)
        -> Result<Option<AspectRatio>, ConverterError>;

    /// Transcodes according to the job.
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError>;

    /// Transcodes with progress reporting.
    ///
    /// If the receiver is dropped, transcoding continues without progress reporting.
    async fn transcode_with_progress(
        &self,
        job: TranscodeJob,
        progress_tx: mpsc::Sender<TranscodeProgress>,
    ) -> Result<TranscodeResult, ConverterError>;

    /// Validates that the external tools are available.
    async fn validate(&self) -> Result<(), ConverterError>;
}
