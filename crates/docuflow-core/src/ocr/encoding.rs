//! Turning a source file into a base64 provider payload.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::EncodingError;
use crate::models::FileInfo;

/// How the provider should treat the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Single image, submitted as `image_url`.
    Image,
    /// Possibly multi-page PDF, submitted as `document_url`.
    Pdf,
}

/// A file ready to be submitted to the OCR provider.
#[derive(Debug, Clone)]
pub struct EncodedDocument {
    pub kind: DocumentKind,
    pub mime_type: &'static str,
    /// Base64 of the raw file bytes.
    pub base64: String,
    pub file_info: FileInfo,
}

impl EncodedDocument {
    /// `data:` URL carrying the payload.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Mime type and submission kind for a lowercase extension (without dot).
pub fn mime_type_for(extension: &str) -> Option<(&'static str, DocumentKind)> {
    let mime = match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "pdf" => return Some(("application/pdf", DocumentKind::Pdf)),
        _ => return None,
    };
    Some((mime, DocumentKind::Image))
}

/// Read and encode a file.
pub fn encode_file(path: &Path) -> Result<EncodedDocument, EncodingError> {
    if !path.exists() {
        return Err(EncodingError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let (mime_type, kind) = mime_type_for(&extension)
        .ok_or_else(|| EncodingError::UnsupportedFormat(extension.clone()))?;

    let bytes = std::fs::read(path).map_err(|source| EncodingError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(EncodingError::Empty(path.to_path_buf()));
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(EncodedDocument {
        kind,
        mime_type,
        base64: STANDARD.encode(&bytes),
        file_info: FileInfo {
            filename,
            size_bytes: bytes.len() as u64,
            extension: format!(".{extension}"),
        },
    })
}
