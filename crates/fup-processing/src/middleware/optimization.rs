use super::Middleware;
use crate::image::ImageProcessor;
use async_trait::async_trait;
use fup_core::{FupError, FupResult, ProcessedFile, ProcessedFileUpdate};
use image::GenericImageView;

/// Default WebP quality (0-100)
pub const DEFAULT_WEBP_QUALITY: u8 = 60;

/// Extension given to optimized images
pub const OPTIMIZED_EXTENSION: &str = ".webp";

/// Re-encodes images as lossy WebP
#[derive(Debug, Clone)]
pub struct OptimizationMiddleware {
    quality: u8,
    types_permitted: Vec<String>,
}

impl Default for OptimizationMiddleware {
    fn default() -> Self {
        Self::new(DEFAULT_WEBP_QUALITY)
    }
}

impl OptimizationMiddleware {
    /// Quality above 100 is clamped
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
            types_permitted: vec!["image/*".to_string()],
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    fn compress_webp(data: &[u8], quality: u8) -> Option<Vec<u8>> {
        let (img, _) = ImageProcessor::decode(data).ok()?;

        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();
        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Some(webp_data.to_vec())
    }
}

#[async_trait]
impl Middleware for OptimizationMiddleware {
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        let quality = self.quality;
        let buffer = file.buffer;
        let original_bytes = buffer.len();

        let compressed = tokio::task::spawn_blocking(move || Self::compress_webp(&buffer, quality))
            .await
            .map_err(|e| FupError::Other(e.into()))?
            .ok_or_else(|| FupError::NotAnImage {
                name: file.original.name.clone(),
            })?;

        tracing::debug!(
            quality,
            original_bytes,
            compressed_bytes = compressed.len(),
            "Image converted to WebP"
        );

        Ok(ProcessedFileUpdate {
            file_name_stem: file.file_name_stem,
            file_extension: OPTIMIZED_EXTENSION.to_string(),
            buffer: compressed,
        })
    }

    fn types_permitted(&self) -> &[String] {
        &self.types_permitted
    }

    fn name(&self) -> &str {
        "optimization"
    }
}
