use crate::converter::FFMPEG_LOG_LEVELS;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Tool paths and codecs are not empty
/// - Audio bitrate and timeout are not 0
/// - The ffmpeg log level is one ffmpeg understands
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let converter = &config.converter;

    if converter.ffmpeg_path.as_os_str().is_empty() {
        return Err(invalid("converter.ffmpeg_path cannot be empty"));
    }
    if converter.ffprobe_path.as_os_str().is_empty() {
        return Err(invalid("converter.ffprobe_path cannot be empty"));
    }

    if converter.timeout_secs == Some(0) {
        return Err(invalid("converter.timeout_secs cannot be 0"));
    }

    if !FFMPEG_LOG_LEVELS.contains(&converter.ffmpeg_log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "converter.ffmpeg_log_level '{}' is not one of: {}",
            converter.ffmpeg_log_level,
            FFMPEG_LOG_LEVELS.join(", ")
        )));
    }

    // Encoding
    let encoding = &converter.encoding;
    if encoding.video_codec.trim().is_empty() {
        return Err(invalid("converter.encoding.video_codec cannot be empty"));
    }
    if encoding.audio_codec.trim().is_empty() {
        return Err(invalid("converter.encoding.audio_codec cannot be empty"));
    }
    if encoding.audio_bitrate_kbps == 0 {
        return Err(invalid("converter.encoding.audio_bitrate_kbps cannot be 0"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
