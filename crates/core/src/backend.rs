//! Provider trait — the abstraction over text-generation backends.
//!
//! A Provider knows how to send a prompt (plus optional system
//! instructions) to a model and return the raw text completion. The
//! orchestrator never inspects which backend is behind the trait.
//!
//! Implementations: Gemini native, OpenAI-compatible, custom endpoints.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "gemini-2.5-flash", "gpt-4o")
    pub model: String,

    /// The user-facing prompt
    pub prompt: String,

    /// Optional system instructions, kept separate so backends that support
    /// a dedicated system field can use it natively
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Temperature (0.0 = deterministic, higher = more varied)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    1.0
}

impl GenerationRequest {
    /// Build a request with just a prompt; system instructions optional.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    /// Attach system instructions.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max output tokens.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The raw generated text
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Every generation backend implements this trait. The solver calls
/// `generate()` without knowing which backend is being used — pure
/// polymorphism. Errors are opaque to the caller: the solver treats every
/// failure as a cycle failure regardless of variant.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a request and block until the complete text comes back.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError>;

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_defaults() {
        let req = GenerationRequest::new("gemini-2.5-flash", "What is 2+2?");
        assert!((req.temperature - 1.0).abs() < f32::EPSILON);
        assert!(req.system.is_none());
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn request_builder_chaining() {
        let req = GenerationRequest::new("gpt-4o", "prompt")
            .with_system("You are a planner.")
            .with_temperature(0.2)
            .with_max_tokens(2048);
        assert_eq!(req.system.as_deref(), Some("You are a planner."));
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, Some(2048));
    }

    #[test]
    fn request_serialization_skips_empty_fields() {
        let req = GenerationRequest::new("m", "p");
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("system"));
        assert!(!json.contains("max_tokens"));
    }
}
