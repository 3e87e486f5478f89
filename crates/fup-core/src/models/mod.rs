//! Domain models
//!
//! Input bodies, per-call option structs and the middleware context.

pub mod file_body;
pub mod options;
pub mod processed;

pub use file_body::FileBody;
pub use options::{MultipleUploadOptions, NameStrategy, ResolvedUploadOptions, SingleUploadOptions};
pub use processed::{ProcessedFile, ProcessedFileUpdate};
