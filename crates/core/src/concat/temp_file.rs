//! Scoped temporary file holding a concatenated title set.

use std::path::{Path, PathBuf};
use tempfile::{Builder, TempPath};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tracing::debug;

use super::ConcatError;

/// Copy buffer size (1 MiB).
const COPY_BUFFER_SIZE: usize = 1024 * 1024;

/// A concatenated VOB on disk.
///
/// The file is deleted when this value is dropped, including when the future
/// that owns it is cancelled.
#[derive(Debug)]
pub struct ConcatFile {
    path: TempPath,
    len: u64,
}

impl ConcatFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of bytes written.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes the file now, reporting any error instead of ignoring it.
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// Appends `sources` in order into a new temporary file under `temp_dir`.
///
/// The file is named `<label>.<random>.VOB`. On error nothing is left behind.
pub async fn concatenate(
    sources: &[PathBuf],
    temp_dir: &Path,
    label: &str,
) -> Result<ConcatFile, ConcatError> {
    if sources.is_empty() {
        return Err(ConcatError::NoSources {
            label: label.to_string(),
        });
    }

    let temp_error = |source| ConcatError::TempFile {
        dir: temp_dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(temp_dir).await.map_err(temp_error)?;

    let prefix = format!("{}.", label);
    let (file, path) = Builder::new()
        .prefix(&prefix)
        .suffix(".VOB")
        .tempfile_in(temp_dir)
        .map_err(temp_error)?
        .into_parts();

    let write_error = |source| ConcatError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, File::from_std(file));
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    for source in sources {
        let mut reader = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConcatError::SourceNotFound {
                    path: source.clone(),
                }
            } else {
                ConcatError::Read {
                    path: source.clone(),
                    source: e,
                }
            }
        })?;

        debug!(unit = label, source = %source.display(), "Appending segment");

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .await
                .map_err(|e| ConcatError::Read {
                    path: source.clone(),
                    source: e,
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .await
                .map_err(write_error)?;

            total_bytes += bytes_read as u64;
        }
    }

    writer.flush().await.map_err(write_error)?;
    drop(writer);

    debug!(
        unit = label,
        path = %path.display(),
        bytes = total_bytes,
        "Concatenated segments"
    );

    Ok(ConcatFile {
        path,
        len: total_bytes,
    })
}
