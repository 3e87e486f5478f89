//! Fup Storage Library
//!
//! This crate provides the storage abstraction used by the upload pipeline and a
//! local filesystem implementation.
//!
//! # Layout
//!
//! Files are written flat into the storage root: the storage key of a file is its
//! final name. Keys must be valid file names (see
//! [`fup_core::validation::is_valid_target_name`]), which rules out separators and
//! `..`, so a key can never resolve outside the root.

pub mod factory;
pub mod fs;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
