use fup_core::{FileBody, FupError, FupResult, MultipleUploadOptions};

use super::FileUploader;
use crate::middleware::MiddlewareChain;

impl FileUploader {
    /// Upload several files in order and return their final names in the same order.
    ///
    /// Files are processed one at a time with the same middleware chain. The first
    /// failure stops the batch; files already written stay on disk.
    #[tracing::instrument(skip_all, fields(file_count = files.len()))]
    pub async fn upload_multiple_files(
        &self,
        files: &[FileBody],
        options: &MultipleUploadOptions,
        middleware: &MiddlewareChain,
    ) -> FupResult<Vec<String>> {
        let result = self.store_files(files, options, middleware).await;
        if let Err(e) = &result {
            e.report("upload_multiple_files");
        }
        result
    }

    async fn store_files(
        &self,
        files: &[FileBody],
        options: &MultipleUploadOptions,
        middleware: &MiddlewareChain,
    ) -> FupResult<Vec<String>> {
        let max = options.max_file_count(&self.config);
        if files.len() > max as usize {
            return Err(FupError::TooManyFiles { max });
        }

        let names = options.names();
        if !names.is_empty() && names.len() != files.len() {
            return Err(FupError::NameCountMismatch);
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for (index, file) in files.iter().enumerate() {
            let name = self
                .store_file(file, &options.for_file(index), middleware)
                .await
                .inspect_err(|e| {
                    tracing::debug!(
                        index,
                        file = %file.name,
                        written = uploaded.len(),
                        error = %e,
                        "Batch upload stopped"
                    )
                })?;
            uploaded.push(name);
        }

        tracing::info!(file_count = uploaded.len(), "Batch upload successful");

        Ok(uploaded)
    }
}
