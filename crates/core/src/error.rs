//! Error types for the Veristep domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Veristep operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Backend errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Structured-output extraction ---
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Input validation ---
    #[error("Question must not be empty")]
    EmptyQuestion,

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors raised by a generation backend. The orchestrator treats every
/// variant identically: a cycle failure that consumes retry budget, except
/// during planning where any backend error is fatal to the whole call.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty completion from provider: {0}")]
    EmptyCompletion(String),
}

/// No JSON value could be recovered from a backend completion.
///
/// Carries a bounded preview of the offending text for diagnostics. The
/// extractor never substitutes a default value on failure.
#[derive(Debug, Clone, Error)]
#[error("no JSON value found in backend output (preview: {preview:?})")]
pub struct ExtractionError {
    /// The original text, truncated to [`PREVIEW_LEN`](ExtractionError::PREVIEW_LEN) characters.
    pub preview: String,
}

impl ExtractionError {
    /// Maximum number of characters kept from the unparseable text.
    pub const PREVIEW_LEN: usize = 200;

    /// Build an error from the full offending text, truncating the preview.
    pub fn from_text(text: &str) -> Self {
        let preview = if text.chars().count() > Self::PREVIEW_LEN {
            let cut: String = text.chars().take(Self::PREVIEW_LEN).collect();
            format!("{cut}…")
        } else {
            text.to_string()
        };
        Self { preview }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn extraction_error_preview_is_bounded() {
        let long_text = "x".repeat(5000);
        let err = ExtractionError::from_text(&long_text);
        assert!(err.preview.chars().count() <= ExtractionError::PREVIEW_LEN + 1);
        assert!(err.preview.ends_with('…'));
    }

    #[test]
    fn extraction_error_short_text_kept_whole() {
        let err = ExtractionError::from_text("no json here");
        assert_eq!(err.preview, "no json here");
        assert!(err.to_string().contains("no json here"));
    }
}
