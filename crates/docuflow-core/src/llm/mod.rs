//! Text-completion provider boundary.

mod openrouter;

pub use openrouter::OpenRouterProvider;

use serde::{Deserialize, Serialize};

use crate::error::CorrectionError;

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Provider answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// A remote text-completion service.
pub trait CompletionProvider: Send + Sync {
    /// Issue one blocking completion request.
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CorrectionError>;
}
