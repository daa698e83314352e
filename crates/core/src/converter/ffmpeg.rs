//! FFmpeg-based converter implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{AspectRatio, AudioStreamIndex, TranscodeJob, TranscodeProgress, TranscodeResult};

/// Number of diagnostic stderr lines kept for error reports.
const STDERR_TAIL_LINES: usize = 64;

/// Minimum delay between two progress samples.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// FFmpeg/FFprobe-based converter implementation.
pub struct FfmpegConverter {
    config: ConverterConfig,
}

impl FfmpegConverter {
    /// Creates a new FFmpeg converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds ffprobe arguments listing audio stream indices, one per line.
    fn build_audio_probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "a".to_string(),
            "-show_entries".to_string(),
            "stream=index".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    /// Builds ffprobe arguments printing the first video stream's display aspect ratio.
    fn build_aspect_probe_args(path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=display_aspect_ratio".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }

    /// Builds ffmpeg arguments for a transcode.
    fn build_transcode_args(&self, job: &TranscodeJob) -> Vec<String> {
        let encoding = &self.config.encoding;

        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            job.audio_stream.map_specifier(),
            "-c:v".to_string(),
            encoding.video_codec.clone(),
            "-c:a".to_string(),
            encoding.audio_codec.clone(),
            "-b:a".to_string(),
            format!("{}k", encoding.audio_bitrate_kbps),
        ];

        if encoding.faststart {
            args.extend(["-movflags".to_string(), "+faststart".to_string()]);
        }

        if let Some(ref aspect) = job.aspect {
            args.extend(["-aspect".to_string(), aspect.to_string()]);
        }

        // Log level and progress
        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-progress".to_string(),
            "pipe:2".to_string(),
        ]);

        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        args.push(job.output_path.to_string_lossy().to_string());

        args
    }

    /// Takes the first non-empty line of the audio probe as the stream index.
    fn parse_first_stream_index(
        path: &Path,
        output: &str,
    ) -> Result<AudioStreamIndex, ConverterError> {
        let Some(first) = output.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return Err(ConverterError::NoAudioStream {
                path: path.to_path_buf(),
            });
        };

        first
            .parse::<u32>()
            .map(AudioStreamIndex)
            .map_err(|e| ConverterError::ParseError {
                reason: format!("unexpected stream index {:?}: {}", first, e),
            })
    }

    /// Unknown ratios (`N/A`, `0:1`, empty output) become `None`.
    fn parse_aspect_output(output: &str) -> Option<AspectRatio> {
        output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .and_then(|l| l.parse().ok())
    }

    /// Whether a stderr line belongs to `-progress` output (`key=value`).
    fn is_progress_line(line: &str) -> bool {
        match line.split_once('=') {
            Some((key, _)) => {
                !key.is_empty()
                    && key
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            }
            None => false,
        }
    }

    fn log_command(&self, program: &Path, args: &[String]) {
        let line = format!("{} {}", program.display(), args.join(" "));
        if self.config.echo_commands {
            info!("▶ {}", line);
        } else {
            debug!(command = %line, "Running external tool");
        }
    }

    /// Runs ffprobe and returns its stdout.
    async fn run_probe(&self, args: &[String]) -> Result<String, ConverterError> {
        self.log_command(&self.config.ffprobe_path, args);

        let output = Command::new(&self.config.ffprobe_path)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConverterError::probe_failed(
                format!("FFprobe exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs the transcode with optional progress reporting.
    async fn run_transcode(
        &self,
        job: &TranscodeJob,
        progress_tx: Option<mpsc::Sender<TranscodeProgress>>,
    ) -> Result<TranscodeResult, ConverterError> {
        let start = Instant::now();

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        if let Some(parent) = job.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let args = self.build_transcode_args(job);
        self.log_command(&self.config.ffmpeg_path, &args);

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConverterError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    ConverterError::Io(e)
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ConverterError::transcode_failed("stderr was not captured", None))?;
        let mut reader = BufReader::new(stderr);

        let time_regex = Regex::new(r"^out_time_ms=(\d+)$").ok();
        let speed_regex = Regex::new(r"^speed=\s*(\d+\.?\d*)x$").ok();

        let work = async {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let mut current_time = 0.0;
            let mut current_speed = None;
            let mut last_progress_send: Option<Instant> = None;

            let mut raw = Vec::new();

            // ffmpeg echoes file names and metadata verbatim, which need not be UTF-8
            while reader.read_until(b'\n', &mut raw).await? > 0 {
                let line = String::from_utf8_lossy(&raw)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                raw.clear();

                if !Self::is_progress_line(&line) {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                    continue;
                }

                if let Some(caps) = time_regex.as_ref().and_then(|re| re.captures(&line)) {
                    if let Ok(us) = caps[1].parse::<f64>() {
                        // out_time_ms is in microseconds despite its name
                        current_time = us / 1_000_000.0;
                    }
                }

                if let Some(caps) = speed_regex.as_ref().and_then(|re| re.captures(&line)) {
                    current_speed = Some(format!("{}x", &caps[1]));
                }

                // Each progress block ends with progress=continue|end
                if let Some(ref tx) = progress_tx {
                    let due = last_progress_send
                        .map(|t| t.elapsed() >= PROGRESS_INTERVAL)
                        .unwrap_or(true);
                    if due && line.starts_with("progress=") {
                        let _ = tx.try_send(TranscodeProgress {
                            job_id: job.job_id.clone(),
                            time_secs: current_time,
                            speed: current_speed.clone(),
                        });
                        last_progress_send = Some(Instant::now());
                    }
                }
            }

            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, tail))
        };

        let outcome = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), work).await.ok(),
            None => Some(work.await),
        };

        let (status, tail) = match outcome {
            Some(Ok(done)) => done,
            Some(Err(e)) => return Err(ConverterError::Io(e)),
            None => {
                let _ = child.kill().await;
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs.unwrap_or_default(),
                });
            }
        };

        if !status.success() {
            let stderr = Vec::from(tail).join("\n");
            return Err(ConverterError::transcode_failed(
                format!("FFmpeg exited with code: {:?}", status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        let output_meta = tokio::fs::metadata(&job.output_path)
            .await
            .map_err(|_| ConverterError::OutputMissing {
                path: job.output_path.clone(),
            })?;

        Ok(TranscodeResult {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Runs `<tool> -version` to check the binary can be executed.
    async fn check_tool(&self, path: &Path) -> Result<(), std::io::Error> {
        Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Converter for FfmpegConverter {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn first_audio_stream(&self, path: &Path) -> Result<AudioStreamIndex, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let stdout = self.run_probe(&Self::build_audio_probe_args(path)).await?;
        Self::parse_first_stream_index(path, &stdout)
    }

    async fn display_aspect_ratio(
        &self,
        path: &Path,
    ) -> Result<Option<AspectRatio>, ConverterError> {
        if !path.exists() {
            return Err(ConverterError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let stdout = self.run_probe(&Self::build_aspect_probe_args(path)).await?;
        Ok(Self::parse_aspect_output(&stdout))
    }

    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, ConverterError> {
        self.run_transcode(&job, None).await
    }

    async fn transcode_with_progress(
        &self,
        job: TranscodeJob,
        progress_tx: mpsc::Sender<TranscodeProgress>,
    ) -> Result<TranscodeResult, ConverterError> {
        self.run_transcode(&job, Some(progress_tx)).await
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Err(e) = self.check_tool(&self.config.ffmpeg_path).await {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        if let Err(e) = self.check_tool(&self.config.ffprobe_path).await {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConverterError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                });
            }
            return Err(ConverterError::Io(e));
        }

        Ok(())
    }
}
