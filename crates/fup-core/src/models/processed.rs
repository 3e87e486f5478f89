use crate::models::FileBody;

/// Middleware context: the per-upload state threaded through the transform chain.
///
/// The name is split at its first `.`: `archive.tar.gz` has stem `archive` and
/// extension `.tar.gz`. A name without a dot has an empty extension.
#[derive(Debug, Clone)]
pub struct ProcessedFile<'a> {
    /// The file as uploaded, for reference only
    pub original: &'a FileBody,
    pub file_name_stem: String,
    /// Extension including the leading dot
    pub file_extension: String,
    pub buffer: Vec<u8>,
}

/// Result of one transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFileUpdate {
    pub file_name_stem: String,
    pub file_extension: String,
    pub buffer: Vec<u8>,
}

impl<'a> ProcessedFile<'a> {
    pub fn new(original: &'a FileBody, file_name: &str, buffer: Vec<u8>) -> Self {
        let (stem, extension) = split_file_name(file_name);
        Self {
            original,
            file_name_stem: stem.to_string(),
            file_extension: extension.to_string(),
            buffer,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.file_name_stem, self.file_extension)
    }

    /// Turn the context into an update carrying the current name and buffer.
    pub fn into_update(self) -> ProcessedFileUpdate {
        ProcessedFileUpdate {
            file_name_stem: self.file_name_stem,
            file_extension: self.file_extension,
            buffer: self.buffer,
        }
    }
}

impl ProcessedFileUpdate {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.file_name_stem, self.file_extension)
    }
}

/// Split at the first `.` into (stem, extension-with-dot).
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.find('.') {
        Some(index) => file_name.split_at(index),
        None => (file_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("file.png"), ("file", ".png"));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive", ".tar.gz"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".env"), ("", ".env"));
    }

    #[test]
    fn test_processed_file_round_trips_name() {
        let body = FileBody::new("a.txt", "text/plain", 0, "SGk=");
        let processed = ProcessedFile::new(&body, "file-1.txt", b"Hi".to_vec());
        assert_eq!(processed.file_name_stem, "file-1");
        assert_eq!(processed.file_extension, ".txt");
        assert_eq!(processed.file_name(), "file-1.txt");

        let mut update = processed.into_update();
        update.file_extension = ".encf".to_string();
        assert_eq!(update.file_name(), "file-1.encf");
        assert_eq!(update.buffer, b"Hi");
    }
}
