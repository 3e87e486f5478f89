use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FupError;

/// Body of a file to upload, as it arrives in an upload request.
///
/// The content travels base64-encoded in `encoded_buffer`; it is decoded once by the
/// pipeline before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBody {
    /// Original name of the file
    pub name: String,
    /// Declared MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Last modification time in unix milliseconds
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
    /// File content, base64-encoded
    #[serde(rename = "buffer")]
    pub encoded_buffer: String,
}

impl FileBody {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: i64,
        encoded_buffer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified,
            encoded_buffer: encoded_buffer.into(),
        }
    }

    /// Build a body from raw bytes, encoding them as base64.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: i64,
        data: &[u8],
    ) -> Self {
        Self::new(
            name,
            mime_type,
            last_modified,
            general_purpose::STANDARD.encode(data),
        )
    }

    /// Compose a body from a file on disk.
    ///
    /// The MIME type is guessed from the extension (falling back to
    /// `application/octet-stream`) and the modification time is taken from the file
    /// metadata.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FupError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FupError::InvalidName(path.display().to_string()))?
            .to_string();

        let data = tokio::fs::read(path).await?;
        let metadata = tokio::fs::metadata(path).await?;
        let last_modified = metadata
            .modified()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
            .unwrap_or_else(|_| Utc::now().timestamp_millis());

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::from_bytes(name, mime_type, last_modified, &data))
    }

    /// Compose bodies for several files, preserving order.
    pub async fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Self>, FupError> {
        let mut bodies = Vec::with_capacity(paths.len());
        for path in paths {
            bodies.push(Self::from_path(path).await?);
        }
        Ok(bodies)
    }

    /// Decode the base64 content.
    pub fn decode_buffer(&self) -> Result<Vec<u8>, FupError> {
        general_purpose::STANDARD
            .decode(self.encoded_buffer.trim())
            .map_err(|source| FupError::InvalidEncoding {
                name: self.name.clone(),
                source,
            })
    }
}
