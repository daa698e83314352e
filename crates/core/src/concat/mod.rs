//! Byte-level concatenation of VOB segments.
//!
//! DVD segments are plain MPEG program stream chunks split at arbitrary
//! boundaries, so appending them reproduces the original stream. The result
//! lives in a [`ConcatFile`], which removes itself when dropped.

mod temp_file;

pub use temp_file::{concatenate, ConcatFile};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while concatenating segments.
#[derive(Debug, Error)]
pub enum ConcatError {
    /// Nothing to concatenate.
    #[error("No source files given for {label}")]
    NoSources { label: String },

    /// A source segment disappeared.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The temporary file could not be created.
    #[error("Failed to create temporary file in {dir}: {source}")]
    TempFile {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a source segment failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the concatenated file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
