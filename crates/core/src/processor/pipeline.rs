//! Pipeline processor implementation.

use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::concat::{concatenate, ConcatError, ConcatFile};
use crate::converter::{AspectRatio, Converter, ConverterError, TranscodeJob, TranscodeProgress, TranscodeResult};

use super::config::{FailurePolicy, ProcessorConfig};
use super::types::{RunReport, UnitOutcome, UnitReport, WorkUnit};

/// Error type for a single unit.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading the segments or writing the temp file failed.
    #[error(transparent)]
    Concat(#[from] ConcatError),

    /// The concatenated file has no audio stream.
    #[error("No audio streams found in {label}")]
    NoAudioStream { label: String },

    /// The prober failed.
    #[error(transparent)]
    Probe(ConverterError),

    /// The transcoder failed.
    #[error(transparent)]
    Transcode(ConverterError),
}

impl PipelineError {
    /// Diagnostic output of the failing external tool.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Probe(e) | Self::Transcode(e) => e.stderr(),
            _ => None,
        }
    }
}

/// Runs work units one after the other.
pub struct PipelineProcessor<C: Converter> {
    config: ProcessorConfig,
    converter: C,
}

impl<C: Converter> PipelineProcessor<C> {
    /// Creates a new pipeline processor.
    pub fn new(config: ProcessorConfig, converter: C) -> Self {
        Self {
            config,
            converter,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Concatenates, probes and transcodes one unit.
    ///
    /// The temporary concatenation is removed before this returns, whatever
    /// the outcome, and also if the future is dropped midway.
    pub async fn process_unit(
        &self,
        unit: &WorkUnit,
        progress_tx: Option<mpsc::Sender<TranscodeProgress>>,
    ) -> Result<TranscodeResult, PipelineError> {
        let temp_dir = self.config.effective_temp_dir();
        let concat = concatenate(&unit.sources, &temp_dir, &unit.label).await?;

        info!(
            unit = %unit.label,
            files = unit.sources.len(),
            bytes = concat.len(),
            "Concatenated VOB files"
        );

        let result = self.probe_and_transcode(unit, &concat, progress_tx).await;

        let temp_path = concat.path().to_path_buf();
        if let Err(e) = concat.close() {
            warn!(
                unit = %unit.label,
                path = %temp_path.display(),
                error = %e,
                "Failed to remove temporary file"
            );
        }

        result
    }

    async fn probe_and_transcode(
        &self,
        unit: &WorkUnit,
        concat: &ConcatFile,
        progress_tx: Option<mpsc::Sender<TranscodeProgress>>,
    ) -> Result<TranscodeResult, PipelineError> {
        let audio_stream = match self.converter.first_audio_stream(concat.path()).await {
            Ok(index) => index,
            Err(ConverterError::NoAudioStream { .. }) => {
                return Err(PipelineError::NoAudioStream {
                    label: unit.label.clone(),
                })
            }
            Err(e) => return Err(PipelineError::Probe(e)),
        };
        debug!(unit = %unit.label, %audio_stream, "🔊 Using audio stream");

        let aspect = self.resolve_aspect(unit, concat.path()).await;

        let job = TranscodeJob {
            job_id: unit.label.clone(),
            input_path: concat.path().to_path_buf(),
            output_path: unit.output_path.clone(),
            audio_stream,
            aspect,
        };

        let result = match progress_tx {
            Some(tx) => self.converter.transcode_with_progress(job, tx).await,
            None => self.converter.transcode(job).await,
        };

        result.map_err(PipelineError::Transcode)
    }

    /// User override first, then probing if enabled. Probe failures only warn.
    async fn resolve_aspect(&self, unit: &WorkUnit, path: &Path) -> Option<AspectRatio> {
        if let Some(ref aspect) = self.config.aspect {
            debug!(unit = %unit.label, %aspect, "📐 Using user-specified aspect ratio");
            return Some(aspect.clone());
        }

        if !self.config.detect_aspect {
            return None;
        }

        match self.converter.display_aspect_ratio(path).await {
            Ok(Some(aspect)) => {
                debug!(unit = %unit.label, %aspect, "📐 Detected aspect ratio");
                Some(aspect)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    unit = %unit.label,
                    error = %e,
                    "Aspect ratio detection failed, leaving it to the transcoder"
                );
                None
            }
        }
    }

    /// Processes `units` in order and aggregates the outcomes.
    pub async fn run(
        &self,
        units: &[WorkUnit],
        progress_tx: Option<mpsc::Sender<TranscodeProgress>>,
    ) -> RunReport {
        let mut report = RunReport::default();

        for (i, unit) in units.iter().enumerate() {
            info!(
                unit = %unit.label,
                output = %unit.output_path.display(),
                "📼 Processing {}/{}",
                i + 1,
                units.len()
            );

            let outcome = match self.process_unit(unit, progress_tx.clone()).await {
                Ok(result) => {
                    info!(
                        unit = %unit.label,
                        bytes = result.output_size_bytes,
                        elapsed_ms = result.duration_ms,
                        "✅ Created {}",
                        result.output_path.display()
                    );
                    UnitOutcome::Converted {
                        output_size_bytes: result.output_size_bytes,
                        duration_ms: result.duration_ms,
                    }
                }
                Err(PipelineError::NoAudioStream { .. }) => {
                    warn!(unit = %unit.label, "❌ No audio streams found, skipping");
                    UnitOutcome::SkippedNoAudio
                }
                Err(e) => {
                    error!(unit = %unit.label, "❌ {}", e);
                    let stderr = e.stderr().map(str::to_string);
                    if let Some(ref stderr) = stderr {
                        error!(unit = %unit.label, "{}", stderr);
                    }
                    UnitOutcome::Failed {
                        error: e.to_string(),
                        stderr,
                    }
                }
            };

            let failed = outcome.is_failure();
            report.units.push(UnitReport {
                label: unit.label.clone(),
                output_path: unit.output_path.clone(),
                outcome,
            });

            if failed && self.config.failure_policy == FailurePolicy::Abort {
                if i + 1 < units.len() {
                    warn!(
                        remaining = units.len() - i - 1,
                        "Aborting after failed unit"
                    );
                    report.aborted = true;
                }
                break;
            }
        }

        report
    }
}
