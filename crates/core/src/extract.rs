//! Tolerant JSON extraction from free-text backend output.
//!
//! Backends are instructed to emit pure JSON but routinely wrap it in prose
//! preambles or markdown code fences. The extractor recovers the single
//! JSON value a completion is supposed to contain, trying progressively
//! looser strategies. It tolerates incidental formatting but never guesses
//! field values: partial or invalid JSON is a hard failure, not a
//! best-effort fill.
//!
//! Strategies, attempted in order, first success wins:
//! 1. Direct parse of the trimmed text.
//! 2. A fenced block explicitly tagged as JSON.
//! 3. Any fenced block (whatever its info string).
//! 4. The first balanced `{...}` or `[...]` span, ignoring delimiters
//!    inside string literals.

use crate::error::ExtractionError;
use serde_json::Value;

/// Extract a single JSON value (object or array) from a text blob.
///
/// Returns [`ExtractionError`] with a bounded preview of the input when no
/// strategy yields valid JSON.
pub fn extract_json(text: &str) -> Result<Value, ExtractionError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(block) = tagged_fence(trimmed)
        && let Ok(value) = serde_json::from_str(block)
    {
        return Ok(value);
    }

    if let Some(block) = any_fence(trimmed)
        && let Ok(value) = serde_json::from_str(block)
    {
        return Ok(value);
    }

    if let Some(span) = balanced_span(trimmed)
        && let Ok(value) = serde_json::from_str(span)
    {
        return Ok(value);
    }

    Err(ExtractionError::from_text(text))
}

/// Contents of the first ```` ```json ````-tagged fence, if any.
fn tagged_fence(text: &str) -> Option<&str> {
    // Case-insensitive tag match; ASCII lowering preserves byte offsets.
    let lower = text.to_ascii_lowercase();
    let open = lower.find("```json")?;
    let body = &text[open + "```json".len()..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Contents of the first fenced block of any kind, if any.
///
/// The opening fence line may carry an info string (a language tag); the
/// block body starts on the next line.
fn any_fence(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip the rest of the opening fence line
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// The first balanced `{...}` or `[...]` span in the text.
///
/// Matches the opener's own delimiter pair only, so an object containing
/// arrays (or vice versa) closes at the correct outermost position.
/// Delimiters inside JSON string literals, including after `\` escapes,
/// do not affect the depth count.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let bytes = text.as_bytes();
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                // `i` sits on an ASCII delimiter, so the slice is valid UTF-8
                return Some(&text[start..=i]);
            }
        }
    }

    None
}
