//! Fup Core Library
//!
//! This crate provides the configuration, error taxonomy, data model, MIME matching
//! and name validation shared by the storage, processing and CLI crates.

pub mod config;
pub mod error;
pub mod mime_types;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{UploadConfig, UploadSettings};
pub use error::{ErrorCategory, FupError, FupResult, LogLevel};
pub use mime_types::{
    extension_for, is_known_mime_type, is_type_included, is_valid_mime_type,
    is_wildcard_mime_type, validate_allowed_types_list,
};
pub use models::{
    FileBody, MultipleUploadOptions, NameStrategy, ProcessedFile, ProcessedFileUpdate,
    ResolvedUploadOptions, SingleUploadOptions,
};
pub use validation::{is_valid_file_name, is_valid_target_name};
