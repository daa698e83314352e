use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One `VTS_<NN>_<N>.VOB` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VobSegment {
    pub path: PathBuf,
    /// The `<NN>` part.
    pub title_set: u8,
    /// The `<N>` part.
    pub segment: u32,
}

impl VobSegment {
    /// Group prefix, e.g. `VTS_01`.
    pub fn prefix(&self) -> String {
        format!("VTS_{:02}", self.title_set)
    }

    fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

/// All segments sharing one `VTS_<NN>` prefix, in playback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VobGroup {
    pub prefix: String,
    pub segments: Vec<VobSegment>,
}

impl VobGroup {
    /// Builds a group, ordering segments by number then file name.
    pub fn new(prefix: impl Into<String>, mut segments: Vec<VobSegment>) -> Self {
        segments.sort_by(|a, b| {
            a.segment
                .cmp(&b.segment)
                .then_with(|| a.file_name().cmp(b.file_name()))
        });
        Self {
            prefix: prefix.into(),
            segments,
        }
    }

    /// Member file paths in concatenation order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.segments.iter().map(|s| s.path.clone()).collect()
    }

    /// Output name used in split mode, e.g. `VTS_01.mp4`.
    pub fn output_file_name(&self) -> String {
        format!("{}.mp4", self.prefix)
    }
}
