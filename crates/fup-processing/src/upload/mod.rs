//! Upload pipeline: decode → validate → name → sanitize → transform → store.

mod batch;
pub mod naming;
mod retrieval;
mod uploader;

pub use naming::resolve_file_name;
pub use uploader::FileUploader;
