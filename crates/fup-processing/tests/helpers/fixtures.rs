use fup_core::FileBody;
use image::{ImageFormat, Rgba, RgbaImage};
use img_parts::{jpeg::Jpeg, ImageEXIF};
use std::io::Cursor;

/// Encode a solid-color image
pub fn create_test_image(width: u32, height: u32, color: [u8; 4], format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let img = match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => image::DynamicImage::ImageRgba8(img),
    };
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, format).unwrap();
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    create_test_image(width, height, [255, 255, 255, 255], ImageFormat::Png)
}

pub fn text_file(name: &str, content: &[u8]) -> FileBody {
    FileBody::from_bytes(name, "text/plain", 1_700_000_000_000, content)
}

pub fn png_file(name: &str, width: u32, height: u32) -> FileBody {
    FileBody::from_bytes(name, "image/png", 1_700_000_000_000, &create_test_png(width, height))
}

/// JPEG carrying an APP1 EXIF segment
pub fn create_jpeg_with_exif(width: u32, height: u32) -> Vec<u8> {
    let data = create_test_image(width, height, [0, 0, 255, 255], ImageFormat::Jpeg);
    let mut jpeg = Jpeg::from_bytes(data.into()).unwrap();
    jpeg.set_exif(Some(b"MM\0*\0\0\0\x08\0\0".to_vec().into()));
    jpeg.encoder().bytes().to_vec()
}

pub fn has_exif(data: &[u8]) -> bool {
    Jpeg::from_bytes(data.to_vec().into()).unwrap().exif().is_some()
}
