use super::Middleware;
use fup_core::{is_type_included, FileBody, FupResult, ProcessedFile};
use std::sync::Arc;

/// Ordered list of middlewares; empty means no transformation
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    steps: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain with a single step
    pub fn single(middleware: impl Middleware + 'static) -> Self {
        Self::new().with(middleware)
    }

    /// Append a step
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.steps.push(Arc::new(middleware));
        self
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.steps.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every applicable step in order.
    ///
    /// Applicability is decided by the original file's declared MIME type, not by
    /// whatever an earlier step turned the content into. The first error aborts
    /// the chain and is returned unchanged.
    pub async fn run(
        &self,
        original: &FileBody,
        file_name: String,
        buffer: Vec<u8>,
    ) -> FupResult<(String, Vec<u8>)> {
        let mut file_name = file_name;
        let mut buffer = buffer;

        for (index, step) in self.steps.iter().enumerate() {
            if !is_type_included(&original.mime_type, step.types_permitted()) {
                tracing::debug!(
                    step = index,
                    middleware = step.name(),
                    mime_type = %original.mime_type,
                    "Middleware skipped"
                );
                continue;
            }

            let start = std::time::Instant::now();
            let update = step
                .transform(ProcessedFile::new(original, &file_name, buffer))
                .await?;

            file_name = update.file_name();
            buffer = update.buffer;

            tracing::debug!(
                step = index,
                middleware = step.name(),
                file_name = %file_name,
                size_bytes = buffer.len(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Middleware applied"
            );
        }

        Ok((file_name, buffer))
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareChain {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        Self {
            steps: vec![middleware],
        }
    }
}

impl From<Vec<Arc<dyn Middleware>>> for MiddlewareChain {
    fn from(steps: Vec<Arc<dyn Middleware>>) -> Self {
        Self { steps }
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|step| step.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fup_core::{FupError, ProcessedFileUpdate};

    struct Suffix {
        suffix: &'static str,
        types: Vec<String>,
    }

    impl Suffix {
        fn new(suffix: &'static str, types: &[&str]) -> Self {
            Self {
                suffix,
                types: types.iter().map(|t| t.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl Middleware for Suffix {
        async fn transform(&self, file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
            let mut buffer = file.buffer;
            buffer.extend_from_slice(self.suffix.as_bytes());
            Ok(ProcessedFileUpdate {
                file_name_stem: format!("{}{}", file.file_name_stem, self.suffix),
                file_extension: file.file_extension,
                buffer,
            })
        }

        fn types_permitted(&self) -> &[String] {
            &self.types
        }
    }

    struct Failing {
        types: Vec<String>,
    }

    #[async_trait]
    impl Middleware for Failing {
        async fn transform(&self, _file: ProcessedFile<'_>) -> FupResult<ProcessedFileUpdate> {
            Err(FupError::Other(anyhow::anyhow!("boom")))
        }

        fn types_permitted(&self) -> &[String] {
            &self.types
        }
    }

    fn text_body() -> FileBody {
        FileBody::from_bytes("a.txt", "text/plain", 0, b"Hi")
    }

    #[tokio::test]
    async fn test_empty_chain_is_identity() {
        let body = text_body();
        let (name, buffer) = MiddlewareChain::new()
            .run(&body, "a.txt".to_string(), b"Hi".to_vec())
            .await
            .unwrap();
        assert_eq!(name, "a.txt");
        assert_eq!(buffer, b"Hi");
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let body = text_body();
        let chain = MiddlewareChain::new()
            .with(Suffix::new("-1", &["*"]))
            .with(Suffix::new("-2", &["text/*"]));

        let (name, buffer) = chain
            .run(&body, "a.txt".to_string(), b"Hi".to_vec())
            .await
            .unwrap();
        assert_eq!(name, "a-1-2.txt");
        assert_eq!(buffer, b"Hi-1-2");
    }

    #[tokio::test]
    async fn test_non_matching_step_is_skipped() {
        let body = text_body();
        let chain = MiddlewareChain::new()
            .with(Suffix::new("-img", &["image/*"]))
            .with(Suffix::new("-txt", &["text/plain"]));

        let (name, _) = chain
            .run(&body, "a.txt".to_string(), b"Hi".to_vec())
            .await
            .unwrap();
        assert_eq!(name, "a-txt.txt");
    }

    #[tokio::test]
    async fn test_error_aborts_chain() {
        let body = text_body();
        let chain: MiddlewareChain = vec![
            Arc::new(Failing {
                types: vec!["*".to_string()],
            }) as Arc<dyn Middleware>,
            Arc::new(Suffix::new("-never", &["*"])),
        ]
        .into();

        let result = chain.run(&body, "a.txt".to_string(), b"Hi".to_vec()).await;
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }
}
