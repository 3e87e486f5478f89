use crate::fs as storage_fs;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use fup_core::validation::is_valid_target_name;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// The directory is created lazily on the first write.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/fup/uploads")
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        LocalStorage {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a file name to its path under the root
    ///
    /// Names containing separators, reserved characters or `..` are rejected so the
    /// resulting path always stays directly inside the base directory.
    fn key_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if !is_valid_target_name(name) {
            return Err(StorageError::InvalidKey(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }

    async fn ensure_base_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn exists(&self, name: &str) -> bool {
        match self.key_to_path(name) {
            Ok(path) => storage_fs::exists(&path).await,
            Err(_) => false,
        }
    }

    async fn read(&self, name: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(name)?;
        let start = std::time::Instant::now();

        let data = storage_fs::read(&path).await?;

        tracing::info!(
            path = %path.display(),
            name = %name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn write(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.key_to_path(name)?;
        self.ensure_base_dir().await?;

        let start = std::time::Instant::now();

        storage_fs::write(&path, data).await?;

        tracing::info!(
            path = %path.display(),
            name = %name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    fn describe(&self, name: &str) -> String {
        self.base_path.join(name).display().to_string()
    }
}
