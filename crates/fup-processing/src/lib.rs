//! Fup Processing Library
//!
//! This crate provides the upload pipeline ([`FileUploader`]), the middleware
//! chain and the built-in middlewares:
//! - Encryption (`encryption` feature)
//! - WebP optimization and watermarking (`image` feature)

#[cfg(feature = "image")]
pub mod image;
pub mod middleware;
pub mod upload;

// Re-export commonly used types
pub use middleware::{Middleware, MiddlewareChain};
pub use upload::FileUploader;

#[cfg(feature = "encryption")]
pub use middleware::{decrypt_buffer, encrypt_buffer, EncryptionMiddleware};
#[cfg(feature = "image")]
pub use middleware::{OptimizationMiddleware, WatermarkMiddleware};
#[cfg(feature = "image")]
pub use crate::image::{ImageProcessor, WatermarkConfig, WatermarkPosition};
