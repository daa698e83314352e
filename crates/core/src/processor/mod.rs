//! Processor module for the VOB-to-MP4 pipeline.
//!
//! Discovered groups are first planned into work units (one per title set in
//! split mode, a single one in combined mode). `PipelineProcessor` then runs
//! each unit sequentially:
//! - Concatenation: appending the unit's segments into a temp file
//! - Probing: finding the first audio stream and the display aspect ratio
//! - Transcoding: writing the MP4
//!
//! The temp file never outlives its unit.
//!
//! # Example
//!
//! ```ignore
//! use dvd2mp4_core::converter::{ConverterConfig, FfmpegConverter};
//! use dvd2mp4_core::discovery::discover_groups;
//! use dvd2mp4_core::processor::{plan_units, OutputMode, PipelineProcessor, ProcessorConfig};
//!
//! let groups = discover_groups(Path::new("/media/DVD/VIDEO_TS")).await?;
//! let units = plan_units(&groups, &OutputMode::Split { output_dir: ".".into() });
//!
//! let converter = FfmpegConverter::new(ConverterConfig::default());
//! let processor = PipelineProcessor::new(ProcessorConfig::default(), converter);
//!
//! let report = processor.run(&units, None).await;
//! println!("{} converted, {} failed", report.converted_count(), report.failed_count());
//! ```

mod config;
mod pipeline;
mod plan;
mod types;

pub use config::{FailurePolicy, ProcessorConfig};
pub use pipeline::{PipelineError, PipelineProcessor};
pub use plan::{default_combined_output, plan_units};
pub use types::{OutputMode, RunReport, UnitOutcome, UnitReport, WorkUnit};
