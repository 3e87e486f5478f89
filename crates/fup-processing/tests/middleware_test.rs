mod helpers;

use async_trait::async_trait;
use fup_core::{FupError, FupResult, ProcessedFile, ProcessedFileUpdate, SingleUploadOptions};
use fup_processing::{
    decrypt_buffer, EncryptionMiddleware, ImageProcessor, Middleware, MiddlewareChain,
    OptimizationMiddleware, WatermarkMiddleware, WatermarkPosition,
};
use helpers::fixtures::{create_test_image, png_file, text_file};
use helpers::setup_uploader;
use image::{GenericImageView, ImageFormat};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Records how often it ran and upper-cases the buffer
struct Upper {
    calls: Arc<AtomicUsize>,
    types: Vec<String>,
}

#[async_trait]
impl Middleware for Upper {
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProcessedFileUpdate {
            file_name_stem: file.file_name_stem.to_uppercase(),
            file_extension: file.file_extension,
            buffer: file.buffer.to_ascii_uppercase(),
        })
    }

    fn types_permitted(&self) -> &[String] {
        &self.types
    }
}

struct Reject;

#[async_trait]
impl Middleware for Reject {
    async fn transform(&self, _file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        Err(FupError::Other(anyhow::anyhow!("rejected by policy")))
    }

    fn types_permitted(&self) -> &[String] {
        const ALL: &[String] = &[];
        ALL
    }
}

fn named(name: &str) -> SingleUploadOptions {
    SingleUploadOptions::new().with_explicit_name(name)
}

#[tokio::test]
async fn test_encryption_round_trip() {
    let app = setup_uploader();
    let chain = MiddlewareChain::single(EncryptionMiddleware::new("s3cret"));

    let name = app
        .uploader
        .upload_file(&text_file("notes.txt", b"top secret"), &named("notes.txt"), &chain)
        .await
        .unwrap();

    assert_eq!(name, "notes.encf");
    let stored = app.uploader.get_file(&name).await.unwrap();
    assert_ne!(stored, b"top secret");
    assert_eq!(decrypt_buffer(&stored, "s3cret"), b"top secret");
    assert!(decrypt_buffer(&stored, "wrong").is_empty());
}

#[tokio::test]
async fn test_empty_password_aborts_upload() {
    let app = setup_uploader();
    let chain = MiddlewareChain::single(EncryptionMiddleware::new(""));

    let err = app
        .uploader
        .upload_file(&text_file("notes.txt", b"Hi"), &named("notes.txt"), &chain)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "The password for encrypting notes is empty!");
    assert_eq!(app.file_count(), 0);
}

#[tokio::test]
async fn test_middleware_skipped_for_other_types() {
    let app = setup_uploader();
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = MiddlewareChain::new().with(Upper {
        calls: calls.clone(),
        types: vec!["image/*".to_string()],
    });

    let name = app
        .uploader
        .upload_file(&text_file("a.txt", b"hi"), &named("a.txt"), &chain)
        .await
        .unwrap();

    assert_eq!(name, "a.txt");
    assert_eq!(app.stored("a.txt"), b"hi");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_runs_in_order() {
    let app = setup_uploader();
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = MiddlewareChain::new()
        .with(Upper {
            calls: calls.clone(),
            types: vec!["text/plain".to_string()],
        })
        .with(EncryptionMiddleware::new("pw"));

    let name = app
        .uploader
        .upload_file(&text_file("a.txt", b"hi"), &named("note.txt"), &chain)
        .await
        .unwrap();

    assert_eq!(name, "NOTE.encf");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(decrypt_buffer(&app.stored(&name), "pw"), b"HI");
}

#[tokio::test]
async fn test_failing_middleware_persists_nothing() {
    let app = setup_uploader();
    let chain: MiddlewareChain = vec![
        Arc::new(EncryptionMiddleware::new("pw")) as Arc<dyn Middleware>,
        Arc::new(Reject),
    ]
    .into();

    // Reject permits no types, so it never runs.
    app.uploader
        .upload_file(&text_file("a.txt", b"hi"), &named("kept.txt"), &chain)
        .await
        .unwrap();

    let chain = MiddlewareChain::new().with(FailingForText);
    let err = app
        .uploader
        .upload_file(&text_file("a.txt", b"hi"), &named("lost.txt"), &chain)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "rejected by policy");
    assert_eq!(app.file_count(), 1);
    assert!(app.dir.path().join("kept.encf").exists());
}

struct FailingForText;

#[async_trait]
impl Middleware for FailingForText {
    async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
        Reject.transform(file).await
    }

    fn types_permitted(&self) -> &[String] {
        static TYPES: std::sync::LazyLock<Vec<String>> =
            std::sync::LazyLock::new(|| vec!["text/*".to_string()]);
        &TYPES
    }
}

#[tokio::test]
async fn test_optimization_converts_images() {
    let app = setup_uploader();
    let chain = MiddlewareChain::single(OptimizationMiddleware::default());

    let name = app
        .uploader
        .upload_file(&png_file("photo.png", 32, 24), &named("photo.png"), &chain)
        .await
        .unwrap();

    assert_eq!(name, "photo.webp");
    let (img, format) = ImageProcessor::decode(&app.stored(&name)).unwrap();
    assert_eq!(format, ImageFormat::WebP);
    assert_eq!(img.dimensions(), (32, 24));
}

#[tokio::test]
async fn test_optimization_rejects_undecodable_image() {
    let app = setup_uploader();
    let chain = MiddlewareChain::single(OptimizationMiddleware::default());
    let body = fup_core::FileBody::from_bytes("broken.png", "image/png", 0, b"not really a png");

    let err = app
        .uploader
        .upload_file(&body, &named("broken.png"), &chain)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "File <broken.png> is not an image!");
    assert_eq!(app.file_count(), 0);
}

#[tokio::test]
async fn test_watermark_applied_to_jpeg() {
    let app = setup_uploader();
    let assets = tempfile::tempdir().unwrap();
    let mark_path = assets.path().join("mark.png");
    std::fs::write(
        &mark_path,
        create_test_image(10, 10, [0, 0, 0, 255], ImageFormat::Png),
    )
    .unwrap();

    let photo = create_test_image(60, 40, [255, 255, 255, 255], ImageFormat::Jpeg);
    let body = fup_core::FileBody::from_bytes("photo.jpg", "image/jpeg", 0, &photo);
    let chain = MiddlewareChain::single(
        WatermarkMiddleware::new(&mark_path)
            .with_size(Some(10), Some(10))
            .with_position(WatermarkPosition::Offset { x: 0, y: 0 }),
    );

    let name = app
        .uploader
        .upload_file(&body, &named("photo.jpg"), &chain)
        .await
        .unwrap();

    assert_eq!(name, "photo.jpg");
    let (img, format) = ImageProcessor::decode(&app.stored(&name)).unwrap();
    assert_eq!(format, ImageFormat::Jpeg);
    assert_eq!(img.dimensions(), (60, 40));
    let corner = img.to_rgba8().get_pixel(2, 2).0;
    let far = img.to_rgba8().get_pixel(50, 30).0;
    assert!(corner[0] < 60, "watermark should darken the corner: {corner:?}");
    assert!(far[0] > 200, "rest of the image should stay light: {far:?}");
}

#[tokio::test]
async fn test_watermark_missing_file_aborts() {
    let app = setup_uploader();
    let chain = MiddlewareChain::single(WatermarkMiddleware::new("/no/such/mark.png"));

    let err = app
        .uploader
        .upload_file(&png_file("photo.png", 8, 8), &named("photo.png"), &chain)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "The image for watermark </no/such/mark.png> does not exist!"
    );
    assert_eq!(app.file_count(), 0);
}
