#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageError, StorageResult};
use fup_core::UploadConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub fn create_storage(config: &UploadConfig) -> StorageResult<Arc<dyn Storage>> {
    config
        .validate()
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    let root = config
        .resolve_root()
        .map_err(|e| StorageError::ConfigError(e.to_string()))?;

    #[cfg(feature = "storage-local")]
    {
        tracing::debug!(root = %root.display(), "Using local storage");
        Ok(Arc::new(LocalStorage::new(root)))
    }

    #[cfg(not(feature = "storage-local"))]
    {
        let _ = root;
        Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        ))
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_storage_absolute_root() {
        let dir = tempdir().unwrap();
        let storage = create_storage(&UploadConfig::absolute(dir.path())).unwrap();

        storage.write("f.txt", b"x").await.unwrap();
        assert!(dir.path().join("f.txt").exists());
    }

    #[test]
    fn test_create_storage_rejects_invalid_config() {
        let config = UploadConfig::new("uploads").with_max_total_file_bytes(0);
        assert!(matches!(
            create_storage(&config),
            Err(StorageError::ConfigError(_))
        ));
    }
}
