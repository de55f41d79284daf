//! LLM-based contextual correction stage.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::CorrectionError;
use crate::llm::{CompletionProvider, CompletionRequest, TokenUsage};

use super::{RemoteTransform, StageKind};

/// System instruction sent with every correction request.
pub const CORRECTION_INSTRUCTION: &str = "You are a proofreader for Thai text produced by OCR. \
Correct likely OCR character confusions and missing or misplaced Thai vowel and tone marks, \
using the surrounding context. Leave non-Thai text, numerals, symbols, brand and product names, \
email addresses and URLs exactly as they are. Return only the corrected text, with no commentary.";

/// USD prices per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub prompt_per_million: f64,
    pub completion_per_million: f64,
}

impl Pricing {
    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 * self.prompt_per_million
            + completion_tokens as f64 * self.completion_per_million)
            / 1_000_000.0
    }
}

/// Cumulative usage of a corrector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageSnapshot {
    pub requests: u64,
    pub failures: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost_usd: Option<f64>,
}

#[derive(Debug, Default)]
struct UsageCounters {
    requests: AtomicU64,
    failures: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    total_tokens: AtomicU64,
}

/// Sends page text to a completion model and returns its correction.
pub struct LlmCorrector {
    provider: Box<dyn CompletionProvider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    pricing: Option<Pricing>,
    usage: UsageCounters,
}

impl LlmCorrector {
    pub fn new(provider: impl CompletionProvider + 'static, model: impl Into<String>) -> Self {
        Self::from_boxed(Box::new(provider), model)
    }

    pub fn from_boxed(provider: Box<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
            max_tokens: 4096,
            pricing: None,
            usage: UsageCounters::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Cumulative usage since construction.
    pub fn usage(&self) -> UsageSnapshot {
        let prompt_tokens = self.usage.prompt_tokens.load(Ordering::Relaxed);
        let completion_tokens = self.usage.completion_tokens.load(Ordering::Relaxed);
        UsageSnapshot {
            requests: self.usage.requests.load(Ordering::Relaxed),
            failures: self.usage.failures.load(Ordering::Relaxed),
            prompt_tokens,
            completion_tokens,
            total_tokens: self.usage.total_tokens.load(Ordering::Relaxed),
            estimated_cost_usd: self.pricing.map(|p| p.cost(prompt_tokens, completion_tokens)),
        }
    }

    fn record_usage(&self, usage: &TokenUsage) {
        self.usage.prompt_tokens.fetch_add(usage.prompt_tokens, Ordering::Relaxed);
        self.usage
            .completion_tokens
            .fetch_add(usage.completion_tokens, Ordering::Relaxed);
        self.usage.total_tokens.fetch_add(usage.total_tokens, Ordering::Relaxed);

        match self.pricing {
            Some(pricing) => info!(
                "LLM usage ({}): prompt={} completion={} total={} cost=${:.6}",
                self.model,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
                pricing.cost(usage.prompt_tokens, usage.completion_tokens)
            ),
            None => info!(
                "LLM usage ({}): prompt={} completion={} total={}",
                self.model, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ),
        }
    }
}

impl RemoteTransform for LlmCorrector {
    fn name(&self) -> &str {
        "llm_correction"
    }

    fn kind(&self) -> StageKind {
        StageKind::LlmCorrection
    }

    fn usage(&self) -> Option<UsageSnapshot> {
        Some(LlmCorrector::usage(self))
    }

    fn try_apply(&self, text: &str) -> Result<String, CorrectionError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            system: CORRECTION_INSTRUCTION.to_string(),
            user: text.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        self.usage.requests.fetch_add(1, Ordering::Relaxed);
        let completion = match self.provider.complete(&request) {
            Ok(completion) => completion,
            Err(e) => {
                self.usage.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        if let Some(usage) = &completion.usage {
            self.record_usage(usage);
        }

        let corrected = completion.text.trim();
        if corrected.is_empty() {
            self.usage.failures.fetch_add(1, Ordering::Relaxed);
            return Err(CorrectionError::EmptyCompletion);
        }

        debug!(
            "LLM correction: {} -> {} chars",
            text.chars().count(),
            corrected.chars().count()
        );
        Ok(corrected.to_string())
    }
}
