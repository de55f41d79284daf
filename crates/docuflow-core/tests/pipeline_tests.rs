//! End-to-end processor tests with in-memory providers.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use docuflow_core::{
    Completion, CompletionProvider, CompletionRequest, CorrectionError, DocuflowError,
    DocumentResponse, EncodedDocument, EncodingError, LlmCorrector, OcrClient, OcrProvider,
    PostProcessingChain, Processor, ProviderError, ProviderPage, Stage, StageKind, TokenUsage,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const RECEIPT: &str =
    "บริษัท ตัวอย่าง จำกัด โทร: 02-123-4567 เลขประจำตัวผู้เสียภาษี: 1234567890123";

struct FakeOcr {
    pages: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl FakeOcr {
    fn new(pages: Vec<&'static str>) -> Self {
        Self {
            pages,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl OcrProvider for FakeOcr {
    fn model(&self) -> &str {
        "fake-ocr"
    }

    fn process(&self, _document: &EncodedDocument) -> Result<Vec<ProviderPage>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .iter()
            .enumerate()
            .map(|(i, text)| ProviderPage {
                index: i as u32,
                markdown: text.to_string(),
                dimensions: None,
                confidence: None,
            })
            .collect())
    }
}

struct DownOcr;

impl OcrProvider for DownOcr {
    fn model(&self) -> &str {
        "down-ocr"
    }

    fn process(&self, _document: &EncodedDocument) -> Result<Vec<ProviderPage>, ProviderError> {
        Err(ProviderError::Status {
            status: 401,
            message: "Unauthorized".into(),
        })
    }
}

struct DownCompletion;

impl CompletionProvider for DownCompletion {
    fn complete(&self, _request: &CompletionRequest) -> Result<Completion, CorrectionError> {
        Err(CorrectionError::Transport("connection refused".into()))
    }
}

struct UppercaseCompletion;

impl CompletionProvider for UppercaseCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CorrectionError> {
        Ok(Completion {
            text: format!(" {} ", request.user.to_uppercase()),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

fn write_image(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"\x89PNG\r\n\x1a\nfake").unwrap();
    path
}

fn processor(provider: impl OcrProvider + 'static) -> Processor {
    Processor::with_client(OcrClient::new(provider), PostProcessingChain::with_defaults())
}

#[test]
fn test_scenario_receipt_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "receipt.png");

    let processor = processor(FakeOcr::new(vec![RECEIPT]));
    let response = processor.process_document(&path, true).unwrap();
    let fields = processor.extract_structured_data(&response);

    assert_eq!(fields.company_name.as_deref(), Some("ตัวอย่าง จำกัด"));
    assert!(fields.phone_numbers.contains("02-123-4567"));
    assert_eq!(fields.tax_id, vec!["1234567890123".to_string()]);
}

#[test]
fn test_provider_failure_yields_no_response() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "scan.png");

    let err = processor(DownOcr).process_document(&path, true).unwrap_err();
    match err {
        DocuflowError::Provider(ProviderError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_chain_runs_over_every_page() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");

    let processor = processor(FakeOcr::new(vec!["  หน้า   ๑  ", "ยอด\n\n๒๕๐ บาท"]));
    let response = processor.process_document(&path, true).unwrap();

    assert_eq!(response.total_pages, 2);
    assert_eq!(response.pages[0].text, "หน้า 1");
    assert_eq!(response.pages[1].text, "ยอด 250 บาท");
    assert_eq!(response.model_used, "fake-ocr");
}

#[test]
fn test_post_processing_can_be_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");

    let response = processor(FakeOcr::new(vec!["  ๑๒๓  "]))
        .process_document(&path, false)
        .unwrap();

    assert_eq!(response.pages[0].text, "  ๑๒๓  ");
}

#[test]
fn test_empty_chain_leaves_pages_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");
    let processor = Processor::with_client(
        OcrClient::new(FakeOcr::new(vec!["  ๑๒๓  "])),
        PostProcessingChain::new(),
    );

    assert!(processor.chain().is_empty());
    let response = processor.process_document(&path, true).unwrap();

    assert_eq!(response.pages[0].text, "  ๑๒๓  ");
}

#[test]
fn test_llm_failure_falls_back_to_stage_input() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");

    let mut processor = processor(FakeOcr::new(vec!["ราคา   ๑๐๐ บาท"]));
    processor.set_llm_corrector(LlmCorrector::new(DownCompletion, "some/model"));

    let response = processor.process_document(&path, true).unwrap();
    assert_eq!(response.pages[0].text, "ราคา 100 บาท");

    let usage = processor.llm_usage().unwrap();
    assert_eq!(usage.requests, 1);
    assert_eq!(usage.failures, 1);
}

#[test]
fn test_llm_correction_and_usage() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");

    let mut processor = processor(FakeOcr::new(vec!["total ๑๐", "page two"]));
    processor.set_llm_corrector(LlmCorrector::new(UppercaseCompletion, "some/model"));

    let response = processor.process_document(&path, true).unwrap();
    assert_eq!(response.pages[0].text, "TOTAL 10");
    assert_eq!(response.pages[1].text, "PAGE TWO");

    let usage = processor.llm_usage().unwrap();
    assert_eq!(usage.requests, 2);
    assert_eq!(usage.failures, 0);
    assert_eq!(usage.total_tokens, 30);
}

#[test]
fn test_only_one_llm_stage_is_registered() {
    let mut processor = processor(FakeOcr::new(vec![]));
    processor.set_llm_corrector(LlmCorrector::new(DownCompletion, "first"));
    processor.set_llm_corrector(LlmCorrector::new(UppercaseCompletion, "second"));

    let chain = processor.chain();
    assert_eq!(chain.len(), 3);
    assert!(chain.contains(StageKind::LlmCorrection));
}

#[test]
fn test_custom_stage_runs_after_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "doc.png");

    let mut processor = processor(FakeOcr::new(vec!["  ๔๒  "]));
    processor.add_post_processor(Stage::custom("suffix", |text| format!("{text}!")));

    assert_eq!(processor.extract_text(&path).unwrap(), "42!");
}

#[test]
fn test_zero_pages_extracts_empty_fields() {
    let processor = processor(FakeOcr::new(vec![]));
    let response = DocumentResponse::new(Vec::new(), "fake-ocr", 0.0, None);

    let fields = processor.extract_structured_data(&response);
    assert!(fields.is_empty());
    assert_eq!(fields.company_name, None);
    assert!(fields.phone_numbers.is_empty());
}

#[test]
fn test_provider_without_pages_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, "blank.png");

    let err = processor(FakeOcr::new(vec![]))
        .process_document(&path, true)
        .unwrap_err();
    assert!(matches!(err, DocuflowError::Provider(ProviderError::NoPages)));
}

#[test]
fn test_batch_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let first = write_image(&dir, "a.png");
    let missing = dir.path().join("missing.png");
    let third = write_image(&dir, "c.png");

    let provider = FakeOcr::new(vec![RECEIPT]);
    let calls = Arc::clone(&provider.calls);
    let processor = processor(provider);

    let items = processor.process_many(&[first.clone(), missing.clone(), third.clone()]);

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].path, first);
    assert!(items[0].is_ok());
    assert!(matches!(
        items[1].outcome,
        Err(DocuflowError::Encoding(EncodingError::NotFound(_)))
    ));
    assert_eq!(items[1].path, missing);
    assert!(items[2].is_ok());
    assert_eq!(items[2].path, third);

    // The missing file fails before reaching the provider.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unsupported_extension_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let err = processor(FakeOcr::new(vec!["x"]))
        .process_document(&path, true)
        .unwrap_err();
    assert!(matches!(
        err,
        DocuflowError::Encoding(EncodingError::UnsupportedFormat(_))
    ));
}
