//! Data models for documents, extracted fields, and configuration.

pub mod config;
pub mod document;
pub mod fields;

pub use config::{DocuflowConfig, ProcessorConfig};
pub use document::{Dimensions, DocumentResponse, FileInfo, PageResult};
pub use fields::StructuredFields;
