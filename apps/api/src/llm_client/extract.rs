//! Pulls a JSON object out of free-text model output.
//!
//! Order: a ```json fenced block first, then the greedy span from the first `{`
//! to the last `}`. The greedy span breaks on stray braces inside prose around
//! the object; callers treat any failure here as a degraded generation.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NotFound,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extracts and parses the JSON payload of a completion.
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let text = text.trim();

    if let Some(inner) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str::<Value>(inner) {
            return Ok(value);
        }
    }

    let span = brace_span(text).ok_or(ExtractError::NotFound)?;
    Ok(serde_json::from_str(span)?)
}

/// Contents of the first ```json ... ``` (or bare ``` ... ```) block.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_ticks = &text[start + 3..];
    let body = after_ticks
        .strip_prefix("json")
        .or_else(|| after_ticks.strip_prefix("JSON"))
        .unwrap_or(after_ticks);
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// First `{` through last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
