pub mod concat;
pub mod config;
pub mod converter;
pub mod discovery;
pub mod processor;
pub mod testing;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use converter::{AspectRatio, Converter, ConverterConfig, ConverterError, FfmpegConverter};
pub use discovery::{discover_groups, DiscoveryError, VobGroup, VobSegment};
pub use processor::{
    default_combined_output, plan_units, FailurePolicy, OutputMode, PipelineProcessor,
    ProcessorConfig, RunReport, UnitOutcome, WorkUnit,
};
