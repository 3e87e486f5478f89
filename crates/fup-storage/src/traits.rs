//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use fup_core::FupError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for FupError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => FupError::NotFound(name),
            StorageError::AlreadyExists(name) => FupError::AlreadyExists(name),
            StorageError::InvalidKey(name) => FupError::InvalidName(name),
            StorageError::ConfigError(msg) => FupError::Config(msg),
            other => FupError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Keys are flat file names under the backend's root. The upload pipeline checks
/// [`Storage::exists`] before [`Storage::write`]; backends should still refuse to
/// replace an existing key so that two racing writers cannot clobber each other.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check if a file exists. Never fails: any access error reads as absent.
    async fn exists(&self, name: &str) -> bool;

    /// Read a file's content
    async fn read(&self, name: &str) -> StorageResult<Vec<u8>>;

    /// Create a file with `data`; fails with [`StorageError::AlreadyExists`] if present
    async fn write(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Human-readable location of a key, used in logs
    fn describe(&self, name: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_conversion() {
        let err: FupError = StorageError::NotFound("a.txt".to_string()).into();
        assert_eq!(err.to_string(), "File a.txt does not exist!");

        let err: FupError = StorageError::AlreadyExists("a.txt".to_string()).into();
        assert_eq!(err.to_string(), "File a.txt already exists!");

        let err: FupError = StorageError::InvalidKey("../a".to_string()).into();
        assert_eq!(err.to_string(), "Invalid file name: ../a");

        let err: FupError = StorageError::WriteFailed("disk full".to_string()).into();
        assert!(matches!(err, FupError::Storage(_)));
    }
}
