//! Image processor - format probing, decoding and metadata scrubbing

use fup_core::{FupError, FupResult};
use image::{DynamicImage, ImageFormat, ImageReader};
use img_parts::{jpeg::Jpeg, png::Png, ImageEXIF};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode `data`, guessing the container format from its magic bytes
    pub fn decode(data: &[u8]) -> FupResult<(DynamicImage, ImageFormat)> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| FupError::ImageProcessing(e.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| FupError::ImageProcessing("Unrecognized image format".to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| FupError::ImageProcessing(e.to_string()))?;
        Ok((img, format))
    }

    /// True when `data` decodes as an image in any supported format
    pub fn is_image(data: &[u8]) -> bool {
        Self::decode(data).is_ok()
    }

    /// Encode `img` into `format`
    ///
    /// JPEG has no alpha channel, so RGBA input is flattened to RGB first.
    pub fn encode(img: &DynamicImage, format: ImageFormat) -> FupResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        let result = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut cursor, format),
            _ => img.write_to(&mut cursor, format),
        };
        result.map_err(|e| {
            FupError::ImageProcessing(format!("Failed to encode {:?}: {}", format, e))
        })?;

        Ok(buffer)
    }

    /// Remove EXIF metadata from image
    pub fn remove_exif(data: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        // Try to parse as JPEG first
        if let Ok(mut jpeg) = Jpeg::from_bytes(data.to_vec().into()) {
            jpeg.set_exif(None);
            return Ok(jpeg.encoder().bytes().to_vec());
        }

        if let Ok(mut png) = Png::from_bytes(data.to_vec().into()) {
            png.set_exif(None);
            return Ok(png.encoder().bytes().to_vec());
        }

        Ok(data.to_vec())
    }

    /// Strip embedded metadata from an image buffer.
    ///
    /// Images are re-encoded in their own format, which drops EXIF and other
    /// ancillary chunks. If the encoder for that format is unavailable the EXIF
    /// segment is removed in place instead. Anything that does not decode as an
    /// image is returned untouched.
    pub fn sanitize(data: Vec<u8>) -> Vec<u8> {
        let (img, format) = match Self::decode(&data) {
            Ok(decoded) => decoded,
            Err(_) => return data,
        };

        let encoded = Self::encode(&img, format);
        Self::reencoded_or_stripped(data, format, encoded)
    }

    /// Pick the re-encoded buffer, or strip EXIF from the original when encoding failed.
    fn reencoded_or_stripped(
        data: Vec<u8>,
        format: ImageFormat,
        encoded: FupResult<Vec<u8>>,
    ) -> Vec<u8> {
        match encoded {
            Ok(encoded) => {
                tracing::debug!(
                    format = ?format,
                    original_bytes = data.len(),
                    sanitized_bytes = encoded.len(),
                    "Image re-encoded without metadata"
                );
                encoded
            }
            Err(e) => {
                tracing::debug!(format = ?format, error = %e, "Re-encode failed, stripping EXIF only");
                Self::remove_exif(&data).unwrap_or(data)
            }
        }
    }

    /// [`ImageProcessor::sanitize`] on the blocking thread pool
    pub async fn sanitize_blocking(data: Vec<u8>) -> FupResult<Vec<u8>> {
        tokio::task::spawn_blocking(move || Self::sanitize(data))
            .await
            .map_err(|e| FupError::Other(e.into()))
    }
}
