//! Configuration structures for the document pipeline.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocuflowError, Result};

/// Main configuration file for docuflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocuflowConfig {
    /// Mistral OCR provider settings.
    pub mistral: MistralConfig,

    /// OpenRouter completion provider settings.
    pub openrouter: OpenRouterConfig,

    /// LLM correction stage settings.
    pub llm: LlmConfig,

    /// Pipeline toggles.
    pub pipeline: PipelineConfig,
}

/// Mistral OCR provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MistralConfig {
    /// API token.
    pub token: Option<String>,

    /// API base URL.
    pub base_url: String,

    /// OCR model identifier.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Ask the provider to return embedded page images.
    pub include_image_base64: bool,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: "https://api.mistral.ai/v1".to_string(),
            model: "mistral-ocr-latest".to_string(),
            timeout_secs: 120,
            include_image_base64: false,
        }
    }
}

/// OpenRouter (OpenAI-compatible) completion provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// API token.
    pub token: Option<String>,

    /// API base URL.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

/// LLM correction stage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Register the LLM correction stage.
    pub enabled: bool,

    /// Completion model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Output-length ceiling in tokens.
    pub max_output_tokens: u32,

    /// USD per million prompt tokens, for cost logging.
    pub prompt_price_per_million: Option<f64>,

    /// USD per million completion tokens, for cost logging.
    pub completion_price_per_million: Option<f64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "google/gemini-2.0-flash-001".to_string(),
            temperature: 0.1,
            max_output_tokens: 4096,
            prompt_price_per_million: None,
            completion_price_per_million: None,
        }
    }
}

/// Pipeline toggles used by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the post-processing chain after OCR.
    pub post_processing: bool,

    /// Extract structured fields from the first page.
    pub extract_fields: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            post_processing: true,
            extract_fields: true,
        }
    }
}

impl DocuflowConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a value by dotted key (e.g. "mistral.token").
    ///
    /// Missing keys and JSON `null` both yield `None`.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;

        for part in key.split('.') {
            current = current.get(part)?;
        }

        if current.is_null() {
            None
        } else {
            Some(current.clone())
        }
    }

    /// Look up a typed value by dotted key, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_value(key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(default)
    }

    /// Set a value by dotted key. The result must still deserialize.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let parts: Vec<&str> = key.split('.').collect();
        let mut current = &mut json;

        for (i, part) in parts.iter().enumerate() {
            if i == parts.len() - 1 {
                let obj = current.as_object_mut().ok_or_else(|| {
                    DocuflowError::configuration(format!("cannot set value at non-object path: {key}"))
                })?;
                if !obj.contains_key(*part) {
                    return Err(DocuflowError::configuration(format!(
                        "configuration key not found: {key}"
                    )));
                }
                obj.insert((*part).to_string(), value.clone());
            } else {
                current = current.get_mut(*part).ok_or_else(|| {
                    DocuflowError::configuration(format!("configuration path not found: {key}"))
                })?;
            }
        }

        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Build the processor settings from this file.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            ocr_credential: self.mistral.token.clone().unwrap_or_default(),
            llm_enabled: self.llm.enabled,
            llm_model: self.llm.model.clone(),
            llm_credential: self.openrouter.token.clone(),
            ocr_model: self.mistral.model.clone(),
            ocr_base_url: self.mistral.base_url.clone(),
            ocr_timeout_secs: self.mistral.timeout_secs,
            include_image_base64: self.mistral.include_image_base64,
            llm_base_url: self.openrouter.base_url.clone(),
            llm_timeout_secs: self.openrouter.timeout_secs,
            temperature: self.llm.temperature,
            max_output_tokens: self.llm.max_output_tokens,
            prompt_price_per_million: self.llm.prompt_price_per_million,
            completion_price_per_million: self.llm.completion_price_per_million,
        }
    }
}

/// Settings a [`crate::Processor`] is built from.
///
/// Validated once at construction; never re-checked per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// OCR provider credential (required).
    pub ocr_credential: String,

    /// Register the LLM correction stage.
    pub llm_enabled: bool,

    /// Completion model identifier.
    pub llm_model: String,

    /// Completion provider credential (required when `llm_enabled`).
    pub llm_credential: Option<String>,

    pub ocr_model: String,
    pub ocr_base_url: String,
    pub ocr_timeout_secs: u64,
    pub include_image_base64: bool,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub prompt_price_per_million: Option<f64>,
    pub completion_price_per_million: Option<f64>,
}

impl ProcessorConfig {
    /// Settings with defaults for everything but the OCR credential.
    pub fn new(ocr_credential: impl Into<String>) -> Self {
        let mut config = DocuflowConfig::default().processor_config();
        config.ocr_credential = ocr_credential.into();
        config.llm_enabled = false;
        config
    }

    /// Enable the LLM correction stage.
    pub fn with_llm(mut self, model: impl Into<String>, credential: impl Into<String>) -> Self {
        self.llm_enabled = true;
        self.llm_model = model.into();
        self.llm_credential = Some(credential.into());
        self
    }

    /// Check that every required credential is present.
    pub fn validate(&self) -> Result<()> {
        if self.ocr_credential.trim().is_empty() {
            return Err(DocuflowError::configuration(
                "OCR credential is required (mistral.token)",
            ));
        }

        if self.llm_enabled {
            let has_llm_credential = self
                .llm_credential
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            if !has_llm_credential {
                return Err(DocuflowError::configuration(
                    "LLM credential is required when the LLM stage is enabled (openrouter.token)",
                ));
            }
            if self.llm_model.trim().is_empty() {
                return Err(DocuflowError::configuration("LLM model identifier is empty"));
            }
        }

        Ok(())
    }
}
