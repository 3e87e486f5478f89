//! Path-level filesystem helpers
//!
//! `exists` never fails, `read` reports a missing path as [`StorageError::NotFound`]
//! and `write` appends to a newly created file, refusing to open one that exists.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{StorageError, StorageResult};

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check if a path exists
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Read the file at `path`
pub async fn read(path: &Path) -> StorageResult<Vec<u8>> {
    if !exists(path).await {
        return Err(StorageError::NotFound(display_name(path)));
    }

    fs::read(path).await.map_err(|e| {
        StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
    })
}

/// Create the file at `path` and append `data` to it
pub async fn write(path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = fs::OpenOptions::new()
        .append(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(display_name(path)),
            _ => StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            )),
        })?;

    file.write_all(data).await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;

    Ok(())
}
