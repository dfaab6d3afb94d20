//! OpenAI-compatible provider implementation.
//!
//! Speaks the `/chat/completions` dialect, which covers OpenAI itself plus
//! OpenRouter, Groq, Ollama, vLLM and most self-hosted gateways. System
//! instructions travel as a leading `system` message.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use veristep_core::backend::{GenerationRequest, GenerationResponse, Provider, Usage};
use veristep_core::error::ProviderError;

/// Provider for any OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new provider for a compatible endpoint.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Shorthand for the OpenAI public API.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    fn build_body(request: &GenerationRequest) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(ref system) = request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": request.prompt }));

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        match response.status().as_u16() {
            200 => {}
            429 => {
                return Err(ProviderError::RateLimited {
                    retry_after_secs: 5,
                });
            }
            401 | 403 => {
                return Err(ProviderError::AuthenticationFailed(format!(
                    "Invalid API key for provider '{}'",
                    self.name
                )));
            }
            status => {
                let error_body = response.text().await.unwrap_or_default();
                warn!(provider = %self.name, status, body = %error_body, "API error");
                return Err(ProviderError::ApiError {
                    status_code: status,
                    message: error_body,
                });
            }
        }

        let api_resp: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse chat completion: {e}"),
            }
        })?;

        api_resp.into_generation_response(&request.model)
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,

    #[serde(default)]
    model: Option<String>,

    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl ChatResponse {
    fn into_generation_response(
        self,
        requested_model: &str,
    ) -> std::result::Result<GenerationResponse, ProviderError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion(
                "chat completion contained no content".into(),
            ));
        }

        let usage = self.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(GenerationResponse {
            text,
            model: self.model.unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_response() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "The answer is 4." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 9, "completion_tokens": 5, "total_tokens": 14 }
        }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        let generation = resp.into_generation_response("gpt-4o").unwrap();
        assert_eq!(generation.text, "The answer is 4.");
        assert_eq!(generation.model, "gpt-4o-2024-08-06");
        assert_eq!(generation.usage.unwrap().prompt_tokens, 9);
    }

    #[test]
    fn empty_choices_is_an_error() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            resp.into_generation_response("m"),
            Err(ProviderError::EmptyCompletion(_))
        ));
    }

    #[test]
    fn request_body_carries_system_message_first() {
        let request = GenerationRequest::new("gpt-4o", "What is 2+2?")
            .with_system("You are a verifier.")
            .with_max_tokens(512);
        let body = OpenAiCompatProvider::build_body(&request);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn request_body_without_system_has_single_user_message() {
        let request = GenerationRequest::new("gpt-4o", "hello");
        let body = OpenAiCompatProvider::build_body(&request);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }
}
