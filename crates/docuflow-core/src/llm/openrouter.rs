//! OpenRouter chat-completions provider (OpenAI-compatible API).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, ProviderError};

use super::{Completion, CompletionProvider, CompletionRequest, TokenUsage};

/// OpenRouter chat-completions client (OpenAI-compatible).
#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
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
        })
    }
}

impl CompletionProvider for OpenRouterProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, CorrectionError> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CorrectionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| CorrectionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CorrectionError::Status {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }

        decode_completion(&text)
    }
}

/// Decode a chat-completions body.
pub(crate) fn decode_completion(body: &str) -> Result<Completion, CorrectionError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CorrectionError::Decode(e.to_string()))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(CorrectionError::EmptyCompletion)?;

    Ok(Completion {
        text,
        usage: response.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_completion_with_usage() {
        let body = r#"{
            "id": "gen-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": " ข้อความ "}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150}
        }"#;

        let completion = decode_completion(body).unwrap();
        assert_eq!(completion.text, " ข้อความ ");
        assert_eq!(
            completion.usage,
            Some(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 30,
                total_tokens: 150,
            })
        );
    }

    #[test]
    fn test_decode_without_choices() {
        assert!(matches!(
            decode_completion(r#"{"choices": []}"#),
            Err(CorrectionError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "google/gemini-2.0-flash-001",
            messages: vec![
                ChatMessage { role: "system", content: "fix" },
                ChatMessage { role: "user", content: "text" },
            ],
            temperature: 0.1,
            max_tokens: 4096,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "text");
        assert_eq!(json["max_tokens"], 4096);
    }
}
