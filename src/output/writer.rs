//! Persistence of downloaded assets
//!
//! Writes are not atomic: a crash mid-write leaves a truncated file behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Errors that can occur while writing an asset
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What the writer did with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// File created or truncated and fully written; carries the byte count
    Written(usize),

    /// File already existed and overwriting was not requested
    Skipped,
}

/// Returns true if something already exists at `path`
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Writes `bytes` to `path`, honoring the existing-file policy
///
/// Without `overwrite` the file is opened with `create_new`, so an existing
/// file is reported as [`WriteStatus::Skipped`] and left untouched even if it
/// appeared after an earlier existence check.
///
/// # Arguments
///
/// * `path` - Destination file; its parent directory must exist
/// * `bytes` - The full asset content
/// * `overwrite` - Truncate and replace an existing file
///
/// # Returns
///
/// * `Ok(WriteStatus)` - Written or skipped
/// * `Err(WriteError)` - The filesystem refused the write
pub async fn write_file(
    path: &Path,
    bytes: &[u8],
    overwrite: bool,
) -> Result<WriteStatus, WriteError> {
    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(path).await {
        Ok(file) => file,
        Err(e) if !overwrite && e.kind() == ErrorKind::AlreadyExists => {
            return Ok(WriteStatus::Skipped);
        }
        Err(e) => return Err(io_error(e)),
    };

    file.write_all(bytes).await.map_err(io_error)?;
    file.flush().await.map_err(io_error)?;

    Ok(WriteStatus::Written(bytes.len()))
}
