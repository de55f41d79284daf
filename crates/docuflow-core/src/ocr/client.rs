//! OCR client: encode, submit, decode.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{ProviderError, Result};
use crate::models::{DocumentResponse, PageResult};

use super::encoding::encode_file;
use super::provider::OcrProvider;

/// Wraps a single remote OCR call per document.
///
/// No retries: a failed call is surfaced immediately.
pub struct OcrClient {
    provider: Box<dyn OcrProvider>,
}

impl OcrClient {
    pub fn new(provider: impl OcrProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Model identifier of the underlying provider.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Run OCR on one file.
    pub fn process_image(&self, path: &Path) -> Result<DocumentResponse> {
        let start = Instant::now();

        let document = encode_file(path)?;
        info!(
            "Submitting {} ({}) to {}",
            document.file_info.filename,
            document.mime_type,
            self.provider.model()
        );

        let provider_pages = self.provider.process(&document)?;
        if provider_pages.is_empty() {
            return Err(ProviderError::NoPages.into());
        }

        let elapsed = start.elapsed().as_secs_f64();
        debug!("OCR returned {} pages in {:.2}s", provider_pages.len(), elapsed);

        let pages = provider_pages
            .into_iter()
            .map(|page| PageResult {
                page_index: page.index,
                text: page.markdown,
                confidence: page.confidence,
                processing_time: Some(elapsed),
                dimensions: page.dimensions,
            })
            .collect();

        Ok(DocumentResponse::new(
            pages,
            self.provider.model(),
            elapsed,
            Some(document.file_info),
        ))
    }
}
