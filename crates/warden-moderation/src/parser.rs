//! JSON candidate extraction from free-form model output.
//!
//! Strategies run in order and the first match wins:
//!
//! 1. [`ExtractionStrategy::FencedJson`]: text after the first "```json" marker
//!    up to the next "```", or to the end when unclosed
//! 2. [`ExtractionStrategy::GenericFence`]: text between the first two "```"
//! 3. [`ExtractionStrategy::BraceScan`]: first `{` through last `}`
//! 4. [`ExtractionStrategy::Fallback`]: the whole response
//!
//! The brace scan is greedy and does not balance braces, so stray braces in
//! surrounding prose end up in the candidate. The candidate is trimmed; an
//! empty candidate is the only extraction failure.

use tracing::debug;
use warden_core::{ModerationError, ModerationResult, RawResponse};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Which extraction rule produced a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// A "```json" tagged block.
    FencedJson,
    /// An untagged or differently tagged fenced block.
    GenericFence,
    /// First `{` to last `}`.
    BraceScan,
    /// Entire response.
    Fallback,
}

/// Apply the extraction rules and return the untrimmed slice they select.
pub fn locate_candidate(text: &str) -> (ExtractionStrategy, &str) {
    if let Some(start) = text.find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        let end = body.find(FENCE).unwrap_or(body.len());
        return (ExtractionStrategy::FencedJson, &body[..end]);
    }

    if let Some(start) = text.find(FENCE) {
        let body = &text[start + FENCE.len()..];
        if let Some(end) = body.find(FENCE) {
            return (ExtractionStrategy::GenericFence, &body[..end]);
        }
    }

    if let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) {
        // A `}` that precedes every `{` selects nothing.
        let candidate = if open <= close { &text[open..=close] } else { "" };
        return (ExtractionStrategy::BraceScan, candidate);
    }

    (ExtractionStrategy::Fallback, text)
}

/// Extract a trimmed JSON candidate from `raw`.
pub fn extract_json(raw: &RawResponse) -> ModerationResult<String> {
    let (strategy, candidate) = locate_candidate(raw.as_str());
    let candidate = candidate.trim();
    debug!(?strategy, candidate_len = candidate.len(), "extracted JSON candidate");

    if candidate.is_empty() {
        return Err(ModerationError::NoJsonFound {
            raw: raw.as_str().to_string(),
        });
    }
    Ok(candidate.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
