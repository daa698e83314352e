//! Testing utilities and mock implementations.
//!
//! `MockConverter` stands in for ffmpeg/ffprobe so the pipeline can be
//! exercised without the real tools installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use dvd2mp4_core::testing::{fixtures, MockConverter};
//!
//! let dir = tempfile::tempdir()?;
//! fixtures::write_vob_files(dir.path(), &[("VTS_01_1.VOB", b"abc".as_slice())]);
//!
//! let converter = MockConverter::new();
//! converter.set_audio_stream("VTS_01", Some(2)).await;
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedTranscode};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Writes each `(file name, contents)` pair into `dir`.
    ///
    /// Panics on I/O errors; intended for tests only.
    pub fn write_vob_files(dir: &Path, files: &[(&str, &[u8])]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, contents)| {
                let path = dir.join(name);
                std::fs::write(&path, contents).expect("failed to write fixture file");
                path
            })
            .collect()
    }

    /// A typical disc layout: menus, two title sets and sidecar files.
    pub fn sample_disc(dir: &Path) -> Vec<PathBuf> {
        write_vob_files(
            dir,
            &[
                ("VIDEO_TS.VOB", b"menu".as_slice()),
                ("VIDEO_TS.IFO", b"ifo".as_slice()),
                ("VTS_01_0.VOB", b"title-menu-".as_slice()),
                ("VTS_01_1.VOB", b"one-".as_slice()),
                ("VTS_01_2.VOB", b"two".as_slice()),
                ("VTS_01_0.IFO", b"ifo".as_slice()),
                ("VTS_02_1.VOB", b"extra".as_slice()),
            ],
        )
    }

    /// Names of the entries in `dir`, sorted.
    pub fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|rd| {
                rd.filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
