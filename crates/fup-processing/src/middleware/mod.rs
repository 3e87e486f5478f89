//! Transform middlewares applied between validation and persistence
//!
//! A [`Middleware`] receives the file's current name and buffer and returns a
//! replacement for both. Steps run in order through a [`MiddlewareChain`]; each
//! step only sees files whose declared MIME type matches its
//! [`Middleware::types_permitted`] list.

mod chain;
#[cfg(feature = "encryption")]
pub mod encryption;
#[cfg(feature = "image")]
pub mod optimization;
#[cfg(feature = "image")]
pub mod watermark;

pub use chain::MiddlewareChain;
#[cfg(feature = "encryption")]
pub use encryption::{decrypt_buffer, encrypt_buffer, EncryptionMiddleware, ENCRYPTED_EXTENSION};
#[cfg(feature = "image")]
pub use optimization::{OptimizationMiddleware, DEFAULT_WEBP_QUALITY, OPTIMIZED_EXTENSION};
#[cfg(feature = "image")]
pub use watermark::WatermarkMiddleware;

use async_trait::async_trait;
use fup_core::{FupResult, ProcessedFile, ProcessedFileUpdate};

/// A single transform step
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Produce the new name parts and buffer for `file`.
    ///
    /// Returning an error aborts the upload before anything is written.
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate>;

    /// MIME types (exact or `type/*`) this step applies to; `*` matches everything
    fn types_permitted(&self) -> &[String];

    /// Short label used in logs
    fn name(&self) -> &str {
        "custom"
    }
}
