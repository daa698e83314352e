//! Discovery of DVD title set groups.
//!
//! A DVD's `VIDEO_TS` folder stores each title set as a run of segments named
//! `VTS_<NN>_<N>.VOB`. Segment 0 is the title set menu, the rest hold the
//! feature content split at roughly 1 GiB boundaries. This module groups the
//! segments by their `VTS_<NN>` prefix.

mod scanner;
mod types;

pub use scanner::{discover_groups, parse_vob_file_name};
pub use types::{VobGroup, VobSegment};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning the input directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Input directory not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Input path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read input directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
