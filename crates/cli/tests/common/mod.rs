//! Shared fixture for CLI tests.
//!
//! Installs shell-script stand-ins for ffmpeg and ffprobe so the binary can be
//! driven end to end without the real tools.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Behavior of the fake ffmpeg/ffprobe pair.
pub struct FakeTools {
    /// Printed by the audio stream probe.
    pub audio_streams: &'static str,
    /// Printed by the aspect ratio probe.
    pub aspect: &'static str,
    /// Make every transcode fail with a diagnostic on stderr.
    pub fail_transcode: bool,
}

impl Default for FakeTools {
    fn default() -> Self {
        Self {
            audio_streams: "1\n",
            aspect: "16:9",
            fail_transcode: false,
        }
    }
}

pub struct TestFixture {
    root: TempDir,
    pub input: PathBuf,
    pub out: PathBuf,
    pub temp: PathBuf,
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl TestFixture {
    pub fn new(tools: FakeTools) -> Self {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("MOVIE");
        let out = root.path().join("out");
        let temp = root.path().join("tmp");
        let bin = root.path().join("bin");
        for dir in [&input, &out, &temp, &bin] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let ffmpeg_body = if tools.fail_transcode {
            "echo 'boom: encoder exploded' >&2\nexit 1".to_string()
        } else {
            format!(
                "echo \"$@\" >> '{}'\nfor last; do :; done\ncp \"$3\" \"$last\"",
                root.path().join("ffmpeg.log").display()
            )
        };
        let ffmpeg = write_script(
            &bin,
            "ffmpeg",
            &format!(
                "case \"$1\" in -version) echo 'ffmpeg version fake'; exit 0;; esac\n{ffmpeg_body}"
            ),
        );
        let ffprobe = write_script(
            &bin,
            "ffprobe",
            &format!(
                "case \"$*\" in\n  *-version*) echo 'ffprobe version fake' ;;\n  *display_aspect_ratio*) echo '{}' ;;\n  *) printf '{}' ;;\nesac",
                tools.aspect,
                tools.audio_streams.replace('\n', "\\n"),
            ),
        );

        Self {
            root,
            input,
            out,
            temp,
            ffmpeg,
            ffprobe,
        }
    }

    /// Writes VOB files into the input folder.
    pub fn write_vobs(&self, files: &[(&str, &[u8])]) {
        for (name, contents) in files {
            std::fs::write(self.input.join(name), contents).unwrap();
        }
    }

    /// The binary, run from the output folder with the fake tools wired in.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dvd2mp4"));
        cmd.current_dir(&self.out)
            .env("RUST_LOG", "info")
            .env_remove("DVD2MP4_CONVERTER__FFMPEG_PATH")
            .env_remove("DVD2MP4_CONVERTER__FFPROBE_PATH")
            .arg("--ffmpeg")
            .arg(&self.ffmpeg)
            .arg("--ffprobe")
            .arg(&self.ffprobe)
            .arg("--temp-dir")
            .arg(&self.temp)
            .arg("-i")
            .arg(&self.input);
        cmd
    }

    /// Argument lines the fake ffmpeg was invoked with, one per transcode.
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.root.path().join("ffmpeg.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn out_entries(&self) -> Vec<String> {
        entries(&self.out)
    }

    pub fn temp_entries(&self) -> Vec<String> {
        entries(&self.temp)
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
