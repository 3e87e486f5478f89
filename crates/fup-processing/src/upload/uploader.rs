use std::sync::Arc;

use fup_core::{
    is_known_mime_type, is_type_included, is_valid_file_name, is_valid_target_name,
    validate_allowed_types_list, FileBody, FupError, FupResult, SingleUploadOptions, UploadConfig,
};
use fup_storage::{create_storage, Storage};

use super::naming::resolve_file_name;
#[cfg(feature = "image")]
use crate::image::ImageProcessor;
use crate::middleware::MiddlewareChain;

/// Validates, names, transforms and stores uploaded files under one storage root.
///
/// The configuration is fixed at construction; every call only reads it.
#[derive(Clone)]
pub struct FileUploader {
    pub(super) config: UploadConfig,
    pub(super) storage: Arc<dyn Storage>,
}

impl FileUploader {
    /// Create an uploader backed by the storage described in `config`
    pub fn new(config: UploadConfig) -> FupResult<Self> {
        let storage = create_storage(&config)?;
        Ok(Self { config, storage })
    }

    /// Create an uploader over an existing storage backend
    pub fn with_storage(config: UploadConfig, storage: Arc<dyn Storage>) -> FupResult<Self> {
        config.validate()?;
        Ok(Self { config, storage })
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Upload a single file and return its final name.
    ///
    /// Nothing is written unless every validation step and every middleware
    /// succeeds. An existing file with the same final name is never replaced.
    #[tracing::instrument(skip_all, fields(file = %file.name, mime_type = %file.mime_type))]
    pub async fn upload_file(
        &self,
        file: &FileBody,
        options: &SingleUploadOptions,
        middleware: &MiddlewareChain,
    ) -> FupResult<String> {
        let result = self.store_file(file, options, middleware).await;
        if let Err(e) = &result {
            e.report("upload_file");
        }
        result
    }

    pub(super) async fn store_file(
        &self,
        file: &FileBody,
        options: &SingleUploadOptions,
        middleware: &MiddlewareChain,
    ) -> FupResult<String> {
        let start = std::time::Instant::now();
        let options = options.resolve(&self.config);

        let buffer = file.decode_buffer()?;

        if buffer.is_empty() || buffer.len() as u64 > options.max_file_bytes {
            return Err(FupError::InvalidSize {
                name: file.name.clone(),
            });
        }

        if !is_known_mime_type(&file.mime_type) {
            return Err(FupError::InvalidMimeType {
                name: file.name.clone(),
            });
        }

        if !is_valid_file_name(&file.name) {
            return Err(FupError::InvalidFileName {
                name: file.name.clone(),
            });
        }

        validate_allowed_types_list(&options.allowed_types).map_err(|index| {
            FupError::InvalidAllowedType {
                mime_type: options.allowed_types[index].clone(),
            }
        })?;

        if !is_type_included(&file.mime_type, &options.allowed_types) {
            return Err(FupError::TypeNotAllowed {
                mime_type: file.mime_type.clone(),
            });
        }

        let candidate = resolve_file_name(file, &options)?;
        if !is_valid_target_name(&candidate) {
            return Err(FupError::InvalidName(candidate));
        }

        #[cfg(feature = "image")]
        let buffer = ImageProcessor::sanitize_blocking(buffer).await?;

        let (file_name, buffer) = middleware.run(file, candidate, buffer).await?;

        if file_name.is_empty() {
            return Err(FupError::EmptyFileName);
        }
        if !is_valid_target_name(&file_name) {
            return Err(FupError::InvalidName(file_name));
        }

        if self.storage.exists(&file_name).await {
            return Err(FupError::AlreadyExists(file_name));
        }

        self.storage.write(&file_name, &buffer).await?;

        tracing::info!(
            name = %file_name,
            path = %self.storage.describe(&file_name),
            strategy = %options.name_strategy,
            size_bytes = buffer.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File upload successful"
        );

        Ok(file_name)
    }
}

impl std::fmt::Debug for FileUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUploader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
