use clap::Parser;
use std::path::PathBuf;

use dvd2mp4_core::AspectRatio;

/// Concatenate DVD VOB files and transcode them to MP4 with ffmpeg.
#[derive(Debug, Parser)]
#[command(name = "dvd2mp4", version, about, args_override_self = true)]
pub struct Cli {
    /// DVD folder containing VTS_NN_N.VOB files
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Combined output file, ignored with --split [default: <input folder name>.mp4]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write one MP4 per VTS prefix instead of a single file
    #[arg(short, long)]
    pub split: bool,

    /// Directory for split outputs [default: .]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Echo external commands and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Force a display aspect ratio, e.g. 16:9 or 4:3
    #[arg(short, long, value_name = "RATIO")]
    pub aspect: Option<AspectRatio>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// ffmpeg binary
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// ffprobe binary
    #[arg(long, value_name = "PATH")]
    pub ffprobe: Option<PathBuf>,

    /// Directory for temporary concatenated VOBs [default: system temp dir]
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Per-transcode timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Stop at the first failed title set
    #[arg(long)]
    pub fail_fast: bool,
}
