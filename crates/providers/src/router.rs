//! Backend selection.
//!
//! A [`ProviderRouter`] holds every backend built from the configuration,
//! keyed by name. Unknown provider names need an explicit `api_url` in the
//! config; otherwise they are skipped with a warning rather than pointed at
//! a guessed endpoint.

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use veristep_config::AppConfig;
use veristep_core::backend::Provider;

/// Named registry of generation backends.
pub struct ProviderRouter {
    backends: HashMap<String, Arc<dyn Provider>>,
    default_name: String,
}

impl ProviderRouter {
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            backends: HashMap::new(),
            default_name: default_name.into(),
        }
    }

    /// Build the full registry from configuration.
    ///
    /// Every entry under `[providers.*]` gets a backend; the configured
    /// default provider is created even when it has no explicit entry.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut router = Self::new(&config.default_provider);

        for (name, overrides) in &config.providers {
            let api_key = overrides
                .api_key
                .as_deref()
                .or(config.api_key.as_deref())
                .unwrap_or("");

            let base_url = overrides
                .api_url
                .clone()
                .or_else(|| default_base_url(name));

            match base_url {
                Some(url) => router.register(name.clone(), make_backend(name, &url, api_key)),
                None => {
                    warn!(provider = %name, "Unknown provider with no api_url configured, skipping")
                }
            }
        }

        if router.get(&config.default_provider).is_none()
            && let Some(url) = default_base_url(&config.default_provider)
        {
            let api_key = config.api_key.as_deref().unwrap_or("");
            router.register(
                config.default_provider.clone(),
                make_backend(&config.default_provider, &url, api_key),
            );
        }

        router
    }

    pub fn register(&mut self, name: impl Into<String>, backend: Arc<dyn Provider>) {
        self.backends.insert(name.into(), backend);
    }

    /// The backend the configuration selects by default, if it was built.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.get(&self.default_name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.backends.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }
}

/// Kept for callers that prefer a free function.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    ProviderRouter::from_config(config)
}

fn make_backend(name: &str, base_url: &str, api_key: &str) -> Arc<dyn Provider> {
    // Gemini speaks its own dialect; everything else is OpenAI-compatible
    match name {
        "gemini" => Arc::new(GeminiProvider::new(api_key).with_base_url(base_url)),
        _ => Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)),
    }
}

/// Base URLs for providers that don't need one configured.
fn default_base_url(name: &str) -> Option<String> {
    let url = match name {
        "gemini" => "https://generativelanguage.googleapis.com",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "ollama" => "http://localhost:11434/v1",
        "vllm" => "http://localhost:8000/v1",
        _ => return None,
    };
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veristep_config::ProviderConfig;

    #[test]
    fn register_and_lookup() {
        let mut router = ProviderRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatProvider::openai("sk-test")));

        assert!(router.default().is_some());
        assert!(router.get("openai").is_some());
        assert!(router.get("missing").is_none());
        assert_eq!(router.names(), vec!["openai"]);
    }

    #[test]
    fn default_config_builds_gemini() {
        let router = ProviderRouter::from_config(&AppConfig::default());
        assert_eq!(router.default().unwrap().name(), "gemini");
    }

    #[test]
    fn configured_provider_plus_default() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "groq".into(),
            ProviderConfig {
                api_key: Some("gsk-test".into()),
                api_url: None,
                default_model: None,
            },
        );
        let router = ProviderRouter::from_config(&config);

        assert!(router.get("groq").is_some());
        // The default (gemini) is built even without an explicit entry
        assert!(router.get("gemini").is_some());
    }

    #[test]
    fn unknown_provider_without_url_is_skipped() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "mystery".into(),
            ProviderConfig {
                api_key: Some("k".into()),
                api_url: None,
                default_model: None,
            },
        );
        let router = ProviderRouter::from_config(&config);
        assert!(router.get("mystery").is_none());
    }

    #[test]
    fn unknown_provider_with_url_is_built() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "internal".into(),
            ProviderConfig {
                api_key: Some("k".into()),
                api_url: Some("http://gateway.internal:8080/v1".into()),
                default_model: None,
            },
        );
        let router = ProviderRouter::from_config(&config);
        assert_eq!(router.get("internal").unwrap().name(), "internal");
    }
}
