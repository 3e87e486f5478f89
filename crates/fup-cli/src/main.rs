//! fup: validate, transform and store files from the command line.
//!
//! Storage settings come from --root or FUP_STORAGE_PATH (see `UploadConfig::from_env`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use fup_cli::{init_tracing, MiddlewareArgs, StorageArgs};
use fup_core::{FileBody, MultipleUploadOptions, NameStrategy, SingleUploadOptions};
use fup_processing::{decrypt_buffer, FileUploader};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fup", about = "Validate, transform and store files")]
struct Cli {
    #[command(flatten)]
    storage: StorageArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Naming strategy: date, uuid, original or explicit
        #[arg(long)]
        strategy: Option<NameStrategy>,
        /// Explicit target name, one per file
        #[arg(long = "name", value_name = "NAME")]
        names: Vec<String>,
        /// Permitted MIME type (exact, "type/*" or "*")
        #[arg(long = "allow", value_name = "TYPE")]
        allowed_types: Vec<String>,
        /// Maximum size of each file in bytes
        #[arg(long, value_name = "BYTES")]
        max_file_bytes: Option<u64>,
        /// Maximum number of files in this batch
        #[arg(long, value_name = "COUNT")]
        max_file_count: Option<u32>,
        #[command(flatten)]
        middleware: MiddlewareArgs,
    },
    /// Read a stored file
    Get {
        /// Final name returned by upload
        name: String,
        /// Write the content here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Decrypt with this password
        #[arg(long, value_name = "PASSWORD")]
        decrypt: Option<String>,
    },
}

#[derive(Serialize)]
struct UploadResponse {
    files: Vec<String>,
}

#[derive(Serialize)]
struct GetResponse {
    name: String,
    size_bytes: usize,
    output: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.storage.load_config()?;
    let uploader = FileUploader::new(config).context("Failed to open storage")?;
    tracing::debug!(config = ?uploader.config(), "Storage ready");

    match cli.command {
        Commands::Upload {
            files,
            strategy,
            names,
            allowed_types,
            max_file_bytes,
            max_file_count,
            middleware,
        } => {
            let bodies = FileBody::from_paths(&files).await?;
            let chain = middleware.build_chain();

            let uploaded = if let [body] = bodies.as_slice() {
                let mut options = SingleUploadOptions::new();
                if let Some(name) = names.first() {
                    options = options.with_explicit_name(name.clone());
                }
                if let Some(strategy) = strategy {
                    options = options.with_name_strategy(strategy);
                }
                if !allowed_types.is_empty() {
                    options = options.with_allowed_types(allowed_types);
                }
                if let Some(max) = max_file_bytes {
                    options = options.with_max_file_bytes(max);
                }
                vec![uploader.upload_file(body, &options, &chain).await?]
            } else {
                let mut options = MultipleUploadOptions::new();
                if !names.is_empty() {
                    options = options.with_names(names);
                }
                if let Some(strategy) = strategy {
                    options = options.with_name_strategy(strategy);
                }
                if !allowed_types.is_empty() {
                    options = options.with_allowed_types(allowed_types);
                }
                if let Some(max) = max_file_bytes {
                    options = options.with_max_file_bytes(max);
                }
                if let Some(max) = max_file_count {
                    options = options.with_max_file_count(max);
                }
                uploader
                    .upload_multiple_files(&bodies, &options, &chain)
                    .await?
            };

            print_json(&UploadResponse { files: uploaded })?;
        }
        Commands::Get {
            name,
            output,
            decrypt,
        } => {
            let mut data = uploader.get_file(&name).await?;
            if let Some(password) = decrypt {
                data = decrypt_buffer(&data, &password);
                if data.is_empty() {
                    anyhow::bail!("Failed to decrypt {}: wrong password or corrupt data", name);
                }
            }

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &data)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    print_json(&GetResponse {
                        name,
                        size_bytes: data.len(),
                        output: path.display().to_string(),
                    })?;
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&data).context("Write to stdout")?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}
