//! Core library for Thai document OCR.
//!
//! This crate provides:
//! - Remote OCR through a pluggable provider (Mistral OCR by default)
//! - A post-processing chain: whitespace/Unicode cleanup, Thai digit
//!   normalization, and optional LLM correction that falls back on failure
//! - Rule-based extraction of business fields (company, tax ID, phones,
//!   amounts, dates, addresses)
//! - A [`Processor`] tying the three together, with batch support

pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod postprocess;
pub mod processor;

pub use error::{CorrectionError, DocuflowError, EncodingError, ProviderError, Result};
pub use extract::StructuredExtractor;
pub use llm::{Completion, CompletionProvider, CompletionRequest, OpenRouterProvider, TokenUsage};
pub use models::{
    Dimensions, DocuflowConfig, DocumentResponse, FileInfo, PageResult, ProcessorConfig,
    StructuredFields,
};
pub use ocr::{EncodedDocument, MistralOcrProvider, OcrClient, OcrProvider, ProviderPage};
pub use postprocess::{
    LlmCorrector, PostProcessingChain, RemoteTransform, Stage, StageKind, TextTransform,
    UsageSnapshot,
};
pub use processor::{BatchItem, BatchReport, Processor};
