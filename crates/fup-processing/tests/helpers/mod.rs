pub mod fixtures;

use fup_core::UploadConfig;
use fup_processing::FileUploader;
use tempfile::TempDir;

/// Uploader writing into its own temporary directory
pub struct TestUploader {
    pub uploader: FileUploader,
    pub dir: TempDir,
}

impl TestUploader {
    pub fn stored(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.dir.path().join(name)).unwrap()
    }

    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Setup an uploader over a fresh storage root
pub fn setup_uploader() -> TestUploader {
    setup_uploader_with(|config| config)
}

pub fn setup_uploader_with(configure: impl FnOnce(UploadConfig) -> UploadConfig) -> TestUploader {
    let dir = tempfile::tempdir().unwrap();
    let config = configure(UploadConfig::absolute(dir.path()));
    let uploader = FileUploader::new(config).unwrap();
    TestUploader { uploader, dir }
}
