use super::Middleware;
use crate::image::{ImageProcessor, Watermark, WatermarkConfig, WatermarkPosition};
use async_trait::async_trait;
use fup_core::{FupError, FupResult, ProcessedFile, ProcessedFileUpdate};
use std::path::{Path, PathBuf};

/// Composites an image loaded from disk onto every uploaded image.
///
/// The output keeps the base image's format and the file keeps its extension.
#[derive(Debug, Clone)]
pub struct WatermarkMiddleware {
    image_path: PathBuf,
    config: WatermarkConfig,
    types_permitted: Vec<String>,
}

impl WatermarkMiddleware {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            config: WatermarkConfig::default(),
            types_permitted: vec!["image/*".to_string()],
        }
    }

    pub fn with_position(mut self, position: WatermarkPosition) -> Self {
        self.config.position = position;
        self
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.config.opacity = opacity;
        self
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }
}

#[async_trait]
impl Middleware for WatermarkMiddleware {
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        let buffer = file.buffer;
        let decoded = tokio::task::spawn_blocking(move || ImageProcessor::decode(&buffer).ok())
            .await
            .map_err(|e| FupError::Other(e.into()))?;
        let Some((img, format)) = decoded else {
            return Err(FupError::NotAnImage {
                name: file.file_name_stem,
            });
        };

        if !fup_storage::fs::exists(&self.image_path).await {
            return Err(FupError::WatermarkNotFound {
                path: self.image_path.display().to_string(),
            });
        }
        let watermark_data = tokio::fs::read(&self.image_path).await?;

        let config = self.config.clone();
        let output = tokio::task::spawn_blocking(move || {
            let marked = Watermark::apply(img, &watermark_data, &config)?;
            ImageProcessor::encode(&marked, format)
        })
        .await
        .map_err(|e| FupError::Other(e.into()))??;

        tracing::debug!(
            watermark = %self.image_path.display(),
            position = ?self.config.position,
            size_bytes = output.len(),
            "Watermark applied"
        );

        Ok(ProcessedFileUpdate {
            file_name_stem: file.file_name_stem,
            file_extension: file.file_extension,
            buffer: output,
        })
    }

    fn types_permitted(&self) -> &[String] {
        &self.types_permitted
    }

    fn name(&self) -> &str {
        "watermark"
    }
}
