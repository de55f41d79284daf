//! Remote OCR: payload encoding, provider boundary, and the client.

mod client;
pub mod encoding;
mod mistral;
mod provider;

pub use client::OcrClient;
pub use encoding::{DocumentKind, EncodedDocument, encode_file};
pub use mistral::MistralOcrProvider;
pub use provider::{OcrProvider, ProviderPage};
