//! OCR output models: pages and the per-document response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size in pixels as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// OCR output for one page of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Zero-based page index, as assigned by the provider.
    pub page_index: u32,

    /// Page text (markdown). Rewritten by the post-processing chain.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0), when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Processing time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,

    /// Page dimensions in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl PageResult {
    pub fn new(page_index: u32, text: impl Into<String>) -> Self {
        Self {
            page_index,
            text: text.into(),
            confidence: None,
            processing_time: None,
            dimensions: None,
        }
    }
}

/// Information about the submitted source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub filename: String,
    pub size_bytes: u64,
    /// Extension including the leading dot (e.g. ".png").
    pub extension: String,
}

/// Complete OCR response for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// Pages ordered by `page_index`.
    pub pages: Vec<PageResult>,

    /// Always equal to `pages.len()`.
    pub total_pages: usize,

    /// Provider model identifier.
    pub model_used: String,

    /// When processing finished.
    pub timestamp: DateTime<Utc>,

    /// Wall-clock seconds from call start to response decode.
    pub total_processing_time: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
}

impl DocumentResponse {
    /// Build a response; pages are sorted by index and `total_pages` derived.
    pub fn new(
        mut pages: Vec<PageResult>,
        model_used: impl Into<String>,
        total_processing_time: f64,
        file_info: Option<FileInfo>,
    ) -> Self {
        pages.sort_by_key(|p| p.page_index);
        Self {
            total_pages: pages.len(),
            pages,
            model_used: model_used.into(),
            timestamp: Utc::now(),
            total_processing_time,
            file_info,
        }
    }

    /// First page, if any.
    pub fn first_page(&self) -> Option<&PageResult> {
        self.pages.first()
    }

    /// All page texts joined by a blank line.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
