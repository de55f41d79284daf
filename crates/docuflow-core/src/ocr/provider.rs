//! Boundary between the OCR client and a remote OCR service.

use crate::error::ProviderError;
use crate::models::Dimensions;

use super::encoding::EncodedDocument;

/// One page as returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderPage {
    pub index: u32,
    pub markdown: String,
    pub dimensions: Option<Dimensions>,
    pub confidence: Option<f32>,
}

/// A remote OCR service.
///
/// Implementations perform exactly one blocking round trip per call.
pub trait OcrProvider: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Submit a document and return its pages.
    fn process(&self, document: &EncodedDocument) -> Result<Vec<ProviderPage>, ProviderError>;
}
