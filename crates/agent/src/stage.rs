//! Stage-local errors.
//!
//! A stage either fails at the backend boundary or fails to recover the
//! structured output it asked for. The solver converts both into the same
//! state-machine transition (a failed cycle), so the distinction only
//! matters for logging.

use thiserror::Error;
use veristep_core::error::{ExtractionError, ProviderError};

/// Why an Execute or Verify stage produced nothing usable.
#[derive(Debug, Error)]
pub enum StageError {
    /// The backend call itself failed (transport, quota, timeout, ...).
    #[error("backend call failed: {0}")]
    Backend(#[from] ProviderError),

    /// The backend answered, but no structured value could be extracted.
    #[error("malformed stage output: {0}")]
    MalformedOutput(#[from] ExtractionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_converts() {
        let err: StageError = ProviderError::Timeout("120s elapsed".into()).into();
        assert!(err.to_string().contains("backend call failed"));
    }

    #[test]
    fn extraction_error_converts() {
        let err: StageError = ExtractionError::from_text("not json").into();
        assert!(err.to_string().contains("malformed stage output"));
    }
}
