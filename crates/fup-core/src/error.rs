//! Error types module
//!
//! Every failure of the upload pipeline is a [`FupError`]. The `Display` text of each
//! variant is the human-readable message callers match on, so it is part of the public
//! contract and must not change casually.

/// Log level used when a failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected failures such as rejected input
    Debug,
    /// Recoverable conditions such as a name collision
    Warn,
    /// Unexpected failures
    Error,
}

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input rejected before any filesystem write
    Validation,
    /// Raised by a transform middleware; aborts the upload
    Middleware,
    /// Target name already present in storage
    Conflict,
    /// Requested file name invalid or missing
    Retrieval,
    /// Underlying storage failure
    Storage,
    /// Anything else, including errors raised by user-supplied middleware
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum FupError {
    #[error("The file <{name}> size is not valid or is empty!")]
    InvalidSize { name: String },

    #[error("The file <{name}> is not valid base64!")]
    InvalidEncoding {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("The mime type of file uploaded <{name}> is not valid!")]
    InvalidMimeType { name: String },

    #[error("The name of file uploaded <{name}> is not valid!")]
    InvalidFileName { name: String },

    #[error("The type -> {mime_type} is not valid!")]
    InvalidAllowedType { mime_type: String },

    #[error("The type -> {mime_type} is not included in the list of possible types!")]
    TypeNotAllowed { mime_type: String },

    #[error("Name of file cannot be empty!")]
    EmptyFileName,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File {0} already exists!")]
    AlreadyExists(String),

    #[error("File {0} does not exist!")]
    NotFound(String),

    #[error("The number of files uploaded exceeds the maximum allowed of {max}!")]
    TooManyFiles { max: u32 },

    #[error("The number of files uploaded not equal to number of names!")]
    NameCountMismatch,

    #[error("The password for encrypting {stem} is empty!")]
    EmptyPassword { stem: String },

    #[error("File <{name}> is not an image!")]
    NotAnImage { name: String },

    #[error("The image for watermark <{path}> does not exist!")]
    WatermarkNotFound { path: String },

    #[error("The watermark image is too large to add.")]
    WatermarkTooLarge,

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for pipeline operations
pub type FupResult<T> = Result<T, FupError>;

impl FupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FupError::InvalidSize { .. }
            | FupError::InvalidEncoding { .. }
            | FupError::InvalidMimeType { .. }
            | FupError::InvalidFileName { .. }
            | FupError::InvalidAllowedType { .. }
            | FupError::TypeNotAllowed { .. }
            | FupError::EmptyFileName
            | FupError::TooManyFiles { .. }
            | FupError::NameCountMismatch => ErrorCategory::Validation,
            FupError::EmptyPassword { .. }
            | FupError::NotAnImage { .. }
            | FupError::WatermarkNotFound { .. }
            | FupError::WatermarkTooLarge
            | FupError::ImageProcessing(_) => ErrorCategory::Middleware,
            FupError::AlreadyExists(_) => ErrorCategory::Conflict,
            FupError::InvalidName(_) | FupError::NotFound(_) => ErrorCategory::Retrieval,
            FupError::Storage(_) => ErrorCategory::Storage,
            FupError::Config(_) | FupError::Other(_) => ErrorCategory::Internal,
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Retrieval => LogLevel::Debug,
            ErrorCategory::Middleware | ErrorCategory::Conflict => LogLevel::Warn,
            ErrorCategory::Storage | ErrorCategory::Internal => LogLevel::Error,
        }
    }

    /// Emit this error through `tracing` at its log level.
    pub fn report(&self, operation: &'static str) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(operation, error = %self, "Operation rejected"),
            LogLevel::Warn => tracing::warn!(operation, error = %self, "Operation failed"),
            LogLevel::Error => tracing::error!(operation, error = %self, "Operation failed"),
        }
    }
}

impl From<std::io::Error> for FupError {
    fn from(err: std::io::Error) -> Self {
        FupError::Storage(format!("IO error: {}", err))
    }
}
