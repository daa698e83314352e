//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::converter::{
    AspectRatio, AudioStreamIndex, Converter, ConverterError, TranscodeJob, TranscodeProgress,
    TranscodeResult,
};

/// A recorded transcode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    /// The job that was submitted.
    pub job: TranscodeJob,
    /// Bytes of the input file at the moment the transcode started.
    pub input_contents: Vec<u8>,
}

/// Mock implementation of the Converter trait.
///
/// Behavior is keyed by unit label, taken from the temp file name
/// (`<label>.<random>.VOB`):
/// - audio stream index per label (default `0:1`), or no audio at all
/// - detected aspect ratio per label (default none)
/// - one-shot probe and transcode errors per label
/// - transcodes that never finish, for cancellation tests
///
/// A successful transcode copies the input to the output path.
///
/// # Example
///
/// ```rust,ignore
/// use dvd2mp4_core::testing::MockConverter;
///
/// let converter = MockConverter::new();
/// converter.set_audio_stream("VTS_02", None).await;
///
/// let processor = PipelineProcessor::new(config, converter);
/// let report = processor.run(&units, None).await;
///
/// let transcodes = processor.converter().recorded_transcodes().await;
/// ```
#[derive(Debug, Default)]
pub struct MockConverter {
    transcodes: Arc<RwLock<Vec<RecordedTranscode>>>,
    audio_streams: Arc<RwLock<HashMap<String, Option<u32>>>>,
    aspects: Arc<RwLock<HashMap<String, AspectRatio>>>,
    probe_errors: Arc<RwLock<HashMap<String, ConverterError>>>,
    transcode_errors: Arc<RwLock<HashMap<String, ConverterError>>>,
    hanging: Arc<RwLock<HashSet<String>>>,
    validate_error: Arc<RwLock<Option<ConverterError>>>,
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded transcodes, failed ones included.
    pub async fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.transcodes.read().await.clone()
    }

    pub async fn transcode_attempts(&self) -> usize {
        self.transcodes.read().await.len()
    }

    /// Audio stream reported for `label`. `None` means the file has no audio.
    pub async fn set_audio_stream(&self, label: &str, index: Option<u32>) {
        self.audio_streams
            .write()
            .await
            .insert(label.to_string(), index);
    }

    /// Aspect ratio reported for `label`.
    pub async fn set_aspect(&self, label: &str, aspect: Option<AspectRatio>) {
        let mut aspects = self.aspects.write().await;
        match aspect {
            Some(aspect) => aspects.insert(label.to_string(), aspect),
            None => aspects.remove(label),
        };
    }

    /// The next audio probe for `label` fails with `error`.
    pub async fn fail_probe(&self, label: &str, error: ConverterError) {
        self.probe_errors
            .write()
            .await
            .insert(label.to_string(), error);
    }

    /// The next transcode for `label` fails with `error`.
    pub async fn fail_transcode(&self, label: &str, error: ConverterError) {
        self.transcode_errors
            .write()
            .await
            .insert(label.to_string(), error);
    }

    /// Transcodes for `label` never complete.
    pub async fn hang_transcode(&self, label: &str) {
        self.hanging.write().await.insert(label.to_string());
    }

    pub async fn fail_validate(&self, error: ConverterError) {
        *self.validate_error.write().await = Some(error);
    }

    fn label_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .and_then(|n| n.split('.').next().map(str::to_string))
            .unwrap_or_default()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn first_audio_stream(&self, path: &Path) -> Result<AudioStreamIndex, ConverterError> {
        let label = Self::label_of(path);

        if let Some(err) = self.probe_errors.write().await.remove(&label) {
            return Err(err);
        }

        match self.audio_streams.read().await.get(&label) {
            Some(None) => Err(ConverterError::NoAudioStream {
                path: path.to_path_buf(),
            }),
            Some(Some(index)) => Ok(AudioStreamIndex(*index)),
            None => Ok(AudioStreamIndex(1)),
        }
    }

    async fn display_aspect_ratio(
        &self,
        path: &Path,
    ) -> Result<Option<AspectRatio>, ConverterError> {
        let label = Self::label_of(path);
        Ok(self.aspects.read().await.get(&label).cloned())
    }

    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        let input_contents = tokio::fs::read(&job.input_path).await.map_err(|_| {
            ConverterError::InputNotFound {
                path: job.input_path.clone(),
            }
        })?;

        self.transcodes.write().await.push(RecordedTranscode {
            job: job.clone(),
            input_contents: input_contents.clone(),
        });

        if self.hanging.read().await.contains(&job.job_id) {
            std::future::pending::<()>().await;
        }

        if let Some(err) = self.transcode_errors.write().await.remove(&job.job_id) {
            return Err(err);
        }

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&job.output_path, &input_contents).await?;

        Ok(TranscodeResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: input_contents.len() as u64,
            duration_ms: 1,
        })
    }

    async fn transcode_with_progress(
        &self,
        job: TranscodeJob,
        progress_tx: mpsc::Sender<TranscodeProgress>,
    ) -> Result<TranscodeResult, ConverterError> {
        let _ = progress_tx
            .send(TranscodeProgress {
                job_id: job.job_id.clone(),
                time_secs: 0.0,
                speed: Some("1x".to_string()),
            })
            .await;

        self.transcode(job).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match self.validate_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
