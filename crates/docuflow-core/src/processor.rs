//! Document processor: OCR, post-processing, and field extraction.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::StructuredExtractor;
use crate::llm::OpenRouterProvider;
use crate::models::{DocumentResponse, ProcessorConfig, StructuredFields};
use crate::ocr::{MistralOcrProvider, OcrClient};
use crate::postprocess::{LlmCorrector, PostProcessingChain, Pricing, Stage, UsageSnapshot};

/// Outcome of one path in a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub outcome: Result<DocumentResponse>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Totals over a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchReport {
    pub successes: usize,
    pub failures: usize,
    /// Sum of per-document processing times, in seconds.
    pub total_time: f64,
}

impl BatchReport {
    pub fn from_items(items: &[BatchItem]) -> Self {
        items.iter().fold(Self::default(), |mut report, item| {
            match &item.outcome {
                Ok(response) => {
                    report.successes += 1;
                    report.total_time += response.total_processing_time;
                }
                Err(_) => report.failures += 1,
            }
            report
        })
    }

    pub fn total(&self) -> usize {
        self.successes + self.failures
    }
}

/// Orchestrates the OCR client, the post-processing chain and the extractor.
///
/// Documents are processed one at a time on the calling thread.
pub struct Processor {
    ocr: OcrClient,
    chain: PostProcessingChain,
    extractor: StructuredExtractor,
}

impl Processor {
    /// Build a processor from validated settings.
    ///
    /// Fails with [`crate::DocuflowError::Configuration`] before any remote call
    /// when a required credential is missing.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;

        let provider = MistralOcrProvider::new(
            config.ocr_credential.as_str(),
            config.ocr_base_url.as_str(),
            config.ocr_model.as_str(),
            Duration::from_secs(config.ocr_timeout_secs),
        )?
        .with_image_base64(config.include_image_base64);

        let mut chain = PostProcessingChain::with_defaults();

        if config.llm_enabled {
            let credential = config.llm_credential.clone().unwrap_or_default();
            let completion = OpenRouterProvider::new(
                credential,
                config.llm_base_url.as_str(),
                Duration::from_secs(config.llm_timeout_secs),
            )?;

            let mut corrector = LlmCorrector::new(completion, config.llm_model.as_str())
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_output_tokens);

            if let (Some(prompt), Some(completion)) = (
                config.prompt_price_per_million,
                config.completion_price_per_million,
            ) {
                corrector = corrector.with_pricing(Pricing {
                    prompt_per_million: prompt,
                    completion_per_million: completion,
                });
            }

            info!("LLM correction enabled with {}", config.llm_model);
            chain.set_llm_corrector(corrector);
        }

        Ok(Self::with_client(OcrClient::new(provider), chain))
    }

    /// Assemble a processor from an existing client and chain.
    pub fn with_client(ocr: OcrClient, chain: PostProcessingChain) -> Self {
        Self {
            ocr,
            chain,
            extractor: StructuredExtractor::new(),
        }
    }

    /// OCR one document, optionally running the chain over every page.
    pub fn process_document(
        &self,
        path: impl AsRef<Path>,
        run_post_processing: bool,
    ) -> Result<DocumentResponse> {
        let path = path.as_ref();
        let mut response = self.ocr.process_image(path)?;

        if run_post_processing && !self.chain.is_empty() {
            let start = Instant::now();
            for page in &mut response.pages {
                page.text = self.chain.apply(&page.text);
            }
            debug!(
                "Post-processed {} pages in {:.2}s",
                response.total_pages,
                start.elapsed().as_secs_f64()
            );
        }

        info!(
            "Processed {} ({} pages)",
            path.display(),
            response.total_pages
        );
        Ok(response)
    }

    /// Fields from the first page of a response.
    pub fn extract_structured_data(&self, response: &DocumentResponse) -> StructuredFields {
        self.extractor.extract_from_response(response)
    }

    /// Post-processed text of the first page, or empty.
    pub fn extract_text(&self, path: impl AsRef<Path>) -> Result<String> {
        let response = self.process_document(path, true)?;
        Ok(response
            .first_page()
            .map(|page| page.text.clone())
            .unwrap_or_default())
    }

    /// Process paths in order; a failing path never stops the rest.
    pub fn process_many<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<BatchItem> {
        paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let outcome = self.process_document(path, true);
                if let Err(e) = &outcome {
                    warn!("Skipping {}: {}", path.display(), e);
                }
                BatchItem {
                    path: path.to_path_buf(),
                    outcome,
                }
            })
            .collect()
    }

    pub fn chain(&self) -> &PostProcessingChain {
        &self.chain
    }

    /// Append a stage to the chain.
    pub fn add_post_processor(&mut self, stage: Stage) {
        self.chain.push(stage);
    }

    /// Register an LLM corrector, replacing any existing one.
    pub fn set_llm_corrector(&mut self, corrector: LlmCorrector) {
        self.chain.set_llm_corrector(corrector);
    }

    /// Usage of the registered LLM stage, if any.
    pub fn llm_usage(&self) -> Option<UsageSnapshot> {
        self.chain.llm_corrector().and_then(|stage| stage.usage())
    }

    pub fn ocr_model(&self) -> &str {
        self.ocr.model()
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("ocr_model", &self.ocr.model())
            .field("chain", &self.chain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DocuflowError, ProviderError};
    use crate::models::PageResult;
    use pretty_assertions::assert_eq;

    fn response(time: f64) -> DocumentResponse {
        DocumentResponse::new(vec![PageResult::new(0, "x")], "m", time, None)
    }

    #[test]
    fn test_missing_ocr_credential_fails_fast() {
        let err = Processor::new(ProcessorConfig::new("  ")).unwrap_err();
        assert!(matches!(err, DocuflowError::Configuration(_)));
    }

    #[test]
    fn test_llm_without_credential_fails_fast() {
        let mut config = ProcessorConfig::new("ocr-key");
        config.llm_enabled = true;

        let err = Processor::new(config).unwrap_err();
        assert!(matches!(err, DocuflowError::Configuration(_)));
    }

    #[test]
    fn test_chain_built_from_config() {
        let processor = Processor::new(ProcessorConfig::new("ocr-key")).unwrap();
        assert_eq!(
            processor.chain().stage_names(),
            vec!["whitespace_cleanup", "digit_normalization"]
        );
        assert!(processor.llm_usage().is_none());

        let config = ProcessorConfig::new("ocr-key").with_llm("some/model", "llm-key");
        let processor = Processor::new(config).unwrap();
        assert_eq!(processor.chain().len(), 3);
        assert_eq!(processor.llm_usage(), Some(UsageSnapshot::default()));
    }

    #[test]
    fn test_batch_report() {
        let items = vec![
            BatchItem {
                path: PathBuf::from("a.png"),
                outcome: Ok(response(1.5)),
            },
            BatchItem {
                path: PathBuf::from("b.png"),
                outcome: Err(ProviderError::NoPages.into()),
            },
            BatchItem {
                path: PathBuf::from("c.png"),
                outcome: Ok(response(0.5)),
            },
        ];

        let report = BatchReport::from_items(&items);
        assert_eq!(report.successes, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.total(), 3);
        assert!((report.total_time - 2.0).abs() < f64::EPSILON);
    }
}
