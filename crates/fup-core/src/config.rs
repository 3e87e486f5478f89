//! Configuration module
//!
//! [`UploadSettings`] is the all-optional construction input; [`UploadConfig`] is the
//! fully-populated, immutable configuration a pipeline instance owns for its lifetime.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FupError;

/// Default maximum size of an uploaded file (6MB)
pub const DEFAULT_MAX_FILES_SIZE: u64 = 6_000_000;
/// Default maximum number of files in one batch
pub const DEFAULT_MAX_FILES: u32 = 6;

/// Construction input, defaults are merged by [`UploadConfig::from`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSettings {
    /// Directory the files are written to
    pub path: String,
    /// Join `path` onto the process working directory (default true)
    pub relative_path: Option<bool>,
    /// Maximum size in bytes of a single uploaded file
    pub max_files_size: Option<u64>,
    /// Maximum count of files in a batch upload
    pub max_files: Option<u32>,
}

impl UploadSettings {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Upload configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub storage_root: PathBuf,
    pub use_process_working_directory: bool,
    pub max_total_file_bytes: u64,
    pub max_file_count: u32,
}

impl From<UploadSettings> for UploadConfig {
    fn from(settings: UploadSettings) -> Self {
        Self {
            storage_root: PathBuf::from(settings.path),
            use_process_working_directory: settings.relative_path.unwrap_or(true),
            max_total_file_bytes: settings.max_files_size.unwrap_or(DEFAULT_MAX_FILES_SIZE),
            max_file_count: settings.max_files.unwrap_or(DEFAULT_MAX_FILES),
        }
    }
}

impl UploadConfig {
    /// Configuration rooted at `path` with every other field defaulted.
    pub fn new(path: impl Into<String>) -> Self {
        UploadSettings::new(path).into()
    }

    /// Absolute storage root: an absolute directory that is not resolved against the
    /// working directory is used as is.
    pub fn absolute(path: impl AsRef<Path>) -> Self {
        Self {
            storage_root: path.as_ref().to_path_buf(),
            use_process_working_directory: false,
            max_total_file_bytes: DEFAULT_MAX_FILES_SIZE,
            max_file_count: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_max_total_file_bytes(mut self, max: u64) -> Self {
        self.max_total_file_bytes = max;
        self
    }

    pub fn with_max_file_count(mut self, max: u32) -> Self {
        self.max_file_count = max;
        self
    }

    /// Load configuration from the environment (and a `.env` file when present).
    ///
    /// `FUP_STORAGE_PATH` is required; `FUP_RELATIVE_PATH`, `FUP_MAX_FILES_SIZE` and
    /// `FUP_MAX_FILES` fall back to their defaults when unset.
    pub fn from_env() -> Result<Self, FupError> {
        dotenvy::dotenv().ok();

        let path = env::var("FUP_STORAGE_PATH")
            .map_err(|_| FupError::Config("FUP_STORAGE_PATH must be set".to_string()))?;

        let relative_path = match env::var("FUP_RELATIVE_PATH") {
            Ok(value) => Some(parse_bool("FUP_RELATIVE_PATH", &value)?),
            Err(_) => None,
        };

        let max_files_size = match env::var("FUP_MAX_FILES_SIZE") {
            Ok(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                FupError::Config("FUP_MAX_FILES_SIZE must be a valid number".to_string())
            })?),
            Err(_) => None,
        };

        let max_files = match env::var("FUP_MAX_FILES") {
            Ok(value) => Some(value.trim().parse::<u32>().map_err(|_| {
                FupError::Config("FUP_MAX_FILES must be a valid number".to_string())
            })?),
            Err(_) => None,
        };

        let config: UploadConfig = UploadSettings {
            path,
            relative_path,
            max_files_size,
            max_files,
        }
        .into();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FupError> {
        if self.storage_root.as_os_str().is_empty() && !self.use_process_working_directory {
            return Err(FupError::Config(
                "Storage path cannot be empty without a relative path".to_string(),
            ));
        }
        if self.max_total_file_bytes == 0 {
            return Err(FupError::Config(
                "Maximum file size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory files are written to and read from.
    pub fn resolve_root(&self) -> Result<PathBuf, FupError> {
        if self.use_process_working_directory {
            let cwd = env::current_dir()?;
            Ok(cwd.join(&self.storage_root))
        } else {
            Ok(self.storage_root.clone())
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, FupError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(FupError::Config(format!("{} must be a boolean", key))),
    }
}
