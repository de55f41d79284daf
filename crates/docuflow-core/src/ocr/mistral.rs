//! Mistral OCR HTTP provider.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;
use crate::models::Dimensions;

use super::encoding::{DocumentKind, EncodedDocument};
use super::provider::{OcrProvider, ProviderPage};

/// Client for the Mistral `/ocr` endpoint.
#[derive(Debug, Clone)]
pub struct MistralOcrProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    include_image_base64: bool,
}

#[derive(Debug, Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: DocumentChunk,
    include_image_base64: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum DocumentChunk {
    #[serde(rename = "image_url")]
    ImageUrl { image_url: String },
    #[serde(rename = "document_url")]
    DocumentUrl { document_url: String },
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    pages: Vec<OcrPage>,
}

#[derive(Debug, Deserialize)]
struct OcrPage {
    index: u32,
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    dimensions: Option<PageDimensions>,
}

#[derive(Debug, Deserialize)]
struct PageDimensions {
    width: u32,
    height: u32,
}

impl MistralOcrProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            include_image_base64: false,
        })
    }

    /// Ask the provider to return embedded page images as well.
    pub fn with_image_base64(mut self, include: bool) -> Self {
        self.include_image_base64 = include;
        self
    }
}

impl OcrProvider for MistralOcrProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn process(&self, document: &EncodedDocument) -> Result<Vec<ProviderPage>, ProviderError> {
        let data_url = document.data_url();
        let chunk = match document.kind {
            DocumentKind::Image => DocumentChunk::ImageUrl { image_url: data_url },
            DocumentKind::Pdf => DocumentChunk::DocumentUrl { document_url: data_url },
        };
        let request = OcrRequest {
            model: &self.model,
            document: chunk,
            include_image_base64: self.include_image_base64,
        };

        let response = self
            .client
            .post(format!("{}/ocr", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            };
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Mistral OCR returned {} bytes", body.len());
        decode_response(&body)
    }
}

/// Decode an `/ocr` response body into provider pages.
pub(crate) fn decode_response(body: &str) -> Result<Vec<ProviderPage>, ProviderError> {
    let response: OcrResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    Ok(response
        .pages
        .into_iter()
        .map(|page| ProviderPage {
            index: page.index,
            markdown: page.markdown,
            dimensions: page.dimensions.map(|d| Dimensions {
                width: d.width,
                height: d.height,
            }),
            confidence: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_response() {
        let body = r#"{
            "pages": [
                {"index": 0, "markdown": "บริษัท ตัวอย่าง จำกัด", "images": [],
                 "dimensions": {"dpi": 200, "height": 1754, "width": 1240}},
                {"index": 1, "markdown": "page two"}
            ],
            "model": "mistral-ocr-2505",
            "usage_info": {"pages_processed": 2, "doc_size_bytes": 1024}
        }"#;

        let pages = decode_response(body).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[0],
            ProviderPage {
                index: 0,
                markdown: "บริษัท ตัวอย่าง จำกัด".to_string(),
                dimensions: Some(Dimensions { width: 1240, height: 1754 }),
                confidence: None,
            }
        );
        assert_eq!(pages[1].dimensions, None);
    }

    #[test]
    fn test_decode_invalid_body() {
        assert!(matches!(decode_response("<html>"), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn test_request_shape() {
        let request = OcrRequest {
            model: "mistral-ocr-latest",
            document: DocumentChunk::DocumentUrl {
                document_url: "data:application/pdf;base64,AAAA".to_string(),
            },
            include_image_base64: false,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["document"]["type"], "document_url");
        assert_eq!(json["document"]["document_url"], "data:application/pdf;base64,AAAA");
        assert_eq!(json["model"], "mistral-ocr-latest");
    }
}
