use fup_core::{FupError, FupResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView};
use std::str::FromStr;

use super::ImageProcessor;

/// Watermark configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    /// Target width; defaults to the base image width
    pub width: Option<u32>,
    /// Target height; defaults to the base image height
    pub height: Option<u32>,
    pub position: WatermarkPosition,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            position: WatermarkPosition::Center,
            opacity: 1.0,
        }
    }
}

/// Watermark position
///
/// `Top` and `Bottom` are centered horizontally along their edge, `Left` and
/// `Right` sit in the top corner of their side. `Offset` places the top-left
/// corner of the watermark at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkPosition {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Center,
    Offset { x: i64, y: i64 },
}

impl FromStr for WatermarkPosition {
    type Err = FupError;

    /// Accepts `top`, `bottom`, `left`, `right`, `center` or an `x,y` offset
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(WatermarkPosition::Top),
            "bottom" => Ok(WatermarkPosition::Bottom),
            "left" => Ok(WatermarkPosition::Left),
            "right" => Ok(WatermarkPosition::Right),
            "center" | "centre" => Ok(WatermarkPosition::Center),
            other => {
                let invalid =
                    || FupError::Config(format!("Invalid watermark position: {}", other));
                let (x, y) = other.split_once(',').ok_or_else(invalid)?;
                let x = x.trim().parse().map_err(|_| invalid())?;
                let y = y.trim().parse().map_err(|_| invalid())?;
                Ok(WatermarkPosition::Offset { x, y })
            }
        }
    }
}

impl WatermarkPosition {
    fn origin(self, base: (u32, u32), mark: (u32, u32)) -> (i64, i64) {
        let free_x = base.0 as i64 - mark.0 as i64;
        let free_y = base.1 as i64 - mark.1 as i64;
        match self {
            WatermarkPosition::Top => (free_x / 2, 0),
            WatermarkPosition::Bottom => (free_x / 2, free_y),
            WatermarkPosition::Left => (0, 0),
            WatermarkPosition::Right => (free_x, 0),
            WatermarkPosition::Center => (free_x / 2, free_y / 2),
            WatermarkPosition::Offset { x, y } => (x, y),
        }
    }
}

pub struct Watermark;

impl Watermark {
    /// Overlay the watermark in `watermark_data` onto `img`
    pub fn apply(
        img: DynamicImage,
        watermark_data: &[u8],
        config: &WatermarkConfig,
    ) -> FupResult<DynamicImage> {
        let (mark, _) = ImageProcessor::decode(watermark_data)?;
        let mut mark = mark.to_rgba8();

        let (img_width, img_height) = img.dimensions();
        let target_width = config.width.unwrap_or(img_width);
        let target_height = config.height.unwrap_or(img_height);

        if target_width == 0
            || target_height == 0
            || target_width > img_width
            || target_height > img_height
        {
            return Err(FupError::WatermarkTooLarge);
        }

        if mark.dimensions() != (target_width, target_height) {
            mark = DynamicImage::ImageRgba8(mark)
                .resize_exact(target_width, target_height, FilterType::Triangle)
                .to_rgba8();
        }

        let opacity = config.opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            for pixel in mark.pixels_mut() {
                pixel[3] = (pixel[3] as f32 * opacity) as u8;
            }
        }

        let (x, y) = config.position.origin(
            (img_width, img_height),
            (target_width, target_height),
        );

        let mut img_rgba = img.to_rgba8();
        imageops::overlay(&mut img_rgba, &mark, x, y);

        Ok(DynamicImage::ImageRgba8(img_rgba))
    }
}
