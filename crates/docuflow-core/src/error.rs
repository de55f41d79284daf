//! Error types for the docuflow-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the docuflow library.
#[derive(Error, Debug)]
pub enum DocuflowError {
    /// The source document could not be read or encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The OCR provider call failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A required setting is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocuflowError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Errors raised while turning a file into a provider payload.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is empty.
    #[error("file is empty: {}", .0.display())]
    Empty(PathBuf),

    /// The extension is not an image or PDF type the provider accepts.
    #[error("unsupported file format: {0:?}")]
    UnsupportedFormat(String),
}

/// Errors raised by the remote OCR provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The provider answered successfully but without any page.
    #[error("provider returned no pages")]
    NoPages,
}

/// Failure of the LLM correction stage.
///
/// Never surfaces to callers: the chain logs it and keeps the stage input.
#[derive(Error, Debug)]
pub enum CorrectionError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("completion service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode completion: {0}")]
    Decode(String),

    #[error("completion was empty")]
    EmptyCompletion,
}

/// Result type for the docuflow library.
pub type Result<T> = std::result::Result<T, DocuflowError>;
