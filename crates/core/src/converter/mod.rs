//! Converter module for probing and transcoding concatenated VOB files.
//!
//! This module provides the `Converter` trait and an implementation backed by
//! the external `ffprobe` and `ffmpeg` binaries.
//!
//! # Features
//!
//! - First audio stream detection (`ffprobe -select_streams a`)
//! - Display aspect ratio detection for the first video stream
//! - H.264/AAC MP4 transcoding with `+faststart`
//! - Progress reporting parsed from `-progress pipe:2`
//! - Optional per-transcode timeout
//!
//! # Example
//!
//! ```ignore
//! use dvd2mp4_core::converter::{Converter, FfmpegConverter, TranscodeJob};
//!
//! let converter = FfmpegConverter::with_defaults();
//! converter.validate().await?;
//!
//! let audio_stream = converter.first_audio_stream(Path::new("/tmp/VTS_01.VOB")).await?;
//! let result = converter
//!     .transcode(TranscodeJob {
//!         job_id: "VTS_01".to_string(),
//!         input_path: PathBuf::from("/tmp/VTS_01.VOB"),
//!         output_path: PathBuf::from("VTS_01.mp4"),
//!         audio_stream,
//!         aspect: None,
//!     })
//!     .await?;
//! println!("Transcoded in {} ms", result.duration_ms);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::{ConverterConfig, EncodingConfig, FFMPEG_LOG_LEVELS};
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use traits::Converter;
pub use types::{AspectRatio, AudioStreamIndex, TranscodeJob, TranscodeProgress, TranscodeResult};
