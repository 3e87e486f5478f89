use fup_core::{is_valid_target_name, FupError, FupResult};

use super::FileUploader;

impl FileUploader {
    /// Read a stored file by its final name.
    ///
    /// Names with separators or reserved characters are rejected before storage is
    /// touched, so `../secret` can never escape the storage root.
    #[tracing::instrument(skip(self))]
    pub async fn get_file(&self, name: &str) -> FupResult<Vec<u8>> {
        let result = self.read_file(name).await;
        if let Err(e) = &result {
            e.report("get_file");
        }
        result
    }

    async fn read_file(&self, name: &str) -> FupResult<Vec<u8>> {
        if !is_valid_target_name(name) {
            return Err(FupError::InvalidName(name.to_string()));
        }

        if !self.storage.exists(name).await {
            return Err(FupError::NotFound(name.to_string()));
        }

        Ok(self.storage.read(name).await?)
    }
}
