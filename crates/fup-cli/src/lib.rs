use anyhow::Context;
use clap::Args;
use fup_core::{UploadConfig, UploadSettings};
use fup_processing::{
    EncryptionMiddleware, MiddlewareChain, OptimizationMiddleware, WatermarkMiddleware,
    WatermarkPosition,
};
use std::path::PathBuf;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Storage settings; without `--root` they come from `FUP_*` environment variables
#[derive(Args, Debug, Clone, Default)]
pub struct StorageArgs {
    /// Storage directory
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Use the root as given instead of joining it onto the working directory
    #[arg(long, global = true)]
    pub absolute: bool,

    /// Default maximum size of a single file in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_files_size: Option<u64>,

    /// Default maximum number of files per batch
    #[arg(long, global = true, value_name = "COUNT")]
    pub max_files: Option<u32>,
}

impl StorageArgs {
    pub fn load_config(&self) -> anyhow::Result<UploadConfig> {
        let config = match &self.root {
            Some(root) => UploadConfig::from(UploadSettings {
                path: root.clone(),
                relative_path: Some(!self.absolute),
                max_files_size: self.max_files_size,
                max_files: self.max_files,
            }),
            None => {
                let mut config = UploadConfig::from_env()
                    .context("Failed to load configuration. Pass --root or set FUP_STORAGE_PATH")?;
                if let Some(max) = self.max_files_size {
                    config = config.with_max_total_file_bytes(max);
                }
                if let Some(max) = self.max_files {
                    config = config.with_max_file_count(max);
                }
                config
            }
        };

        config.validate().context("Invalid storage configuration")?;
        Ok(config)
    }
}

/// Transform steps applied to every uploaded file, in the order listed here
#[derive(Args, Debug, Clone)]
pub struct MiddlewareArgs {
    /// Watermark image composited onto uploaded images
    #[arg(long, value_name = "PATH")]
    pub watermark: Option<PathBuf>,

    /// top, bottom, left, right, center or an "x,y" offset
    #[arg(long, default_value = "center", requires = "watermark")]
    pub position: WatermarkPosition,

    #[arg(long, requires = "watermark")]
    pub watermark_width: Option<u32>,

    #[arg(long, requires = "watermark")]
    pub watermark_height: Option<u32>,

    #[arg(long, default_value_t = 1.0, requires = "watermark")]
    pub opacity: f32,

    /// Convert images to WebP
    #[arg(long)]
    pub optimize: bool,

    /// WebP quality (0-100)
    #[arg(long, default_value_t = fup_processing::middleware::DEFAULT_WEBP_QUALITY, requires = "optimize")]
    pub quality: u8,

    /// Encrypt files with this password
    #[arg(long, value_name = "PASSWORD")]
    pub encrypt: Option<String>,
}

impl Default for MiddlewareArgs {
    fn default() -> Self {
        Self {
            watermark: None,
            position: WatermarkPosition::Center,
            watermark_width: None,
            watermark_height: None,
            opacity: 1.0,
            optimize: false,
            quality: fup_processing::middleware::DEFAULT_WEBP_QUALITY,
            encrypt: None,
        }
    }
}

impl MiddlewareArgs {
    /// Watermark, then optimization, then encryption
    pub fn build_chain(&self) -> MiddlewareChain {
        let mut chain = MiddlewareChain::new();

        if let Some(path) = &self.watermark {
            chain = chain.with(
                WatermarkMiddleware::new(path)
                    .with_position(self.position)
                    .with_size(self.watermark_width, self.watermark_height)
                    .with_opacity(self.opacity),
            );
        }
        if self.optimize {
            chain = chain.with(OptimizationMiddleware::new(self.quality));
        }
        if let Some(password) = &self.encrypt {
            chain = chain.with(EncryptionMiddleware::new(password.clone()));
        }

        chain
    }
}
