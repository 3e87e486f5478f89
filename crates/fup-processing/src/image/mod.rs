//! Image helpers shared by the upload pipeline and the image middlewares

pub mod processor;
pub mod watermark;

pub use processor::ImageProcessor;
pub use watermark::{Watermark, WatermarkConfig, WatermarkPosition};
