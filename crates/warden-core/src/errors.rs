//! Error taxonomy for the moderation pipeline.
//!
//! Every pipeline stage fails fast with a [`ModerationError`]. The command
//! boundary converts each error into one user-visible message via
//! [`ModerationError::user_message`] and logs the diagnostic.

use crate::types::RawResponse;

/// Result type alias for pipeline operations.
pub type ModerationResult<T> = Result<T, ModerationError>;

/// User-facing text for parse and validation failures.
pub const INVALID_RESPONSE_MESSAGE: &str =
    "Error: The model did not return a valid JSON response. Please try again.";

// ─────────────────────────────────────────────────────────────────────────────
// InferenceError
// ─────────────────────────────────────────────────────────────────────────────

/// Failures talking to the text-generation backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Backend unreachable, connection dropped, or request timed out.
    #[error("connection error: {0}")]
    Connection(String),

    /// Backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error description.
        message: String,
    },

    /// Backend answered 2xx but the body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl InferenceError {
    /// Error category string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "network",
            Self::Api { .. } => "api",
            Self::InvalidResponse(_) => "parse",
        }
    }

    /// Whether the backend reported the model as missing.
    pub fn is_model_missing(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ModerationError
// ─────────────────────────────────────────────────────────────────────────────

/// Pipeline error. One variant per failure class; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    /// The reported message no longer exists.
    #[error("message {message_id} not found")]
    NotFound {
        /// Identifier that was looked up.
        message_id: String,
    },

    /// Missing read or send access on the platform.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Inference backend failure.
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// Extraction produced an empty candidate.
    #[error("no JSON found in model response")]
    NoJsonFound {
        /// Full model output.
        raw: String,
    },

    /// Candidate is not a JSON object or has no usable `action`.
    #[error("malformed decision: {reason}")]
    MalformedDecision {
        /// What was wrong with the candidate.
        reason: String,
        /// The extracted candidate text.
        candidate: String,
        /// Full model output, attached by the pipeline.
        raw: Option<String>,
    },

    /// Anything else.
    #[error("{0}")]
    Unexpected(String),
}

impl ModerationError {
    /// Attach the full model output to a validation failure.
    #[must_use]
    pub fn with_raw_response(self, raw: &RawResponse) -> Self {
        match self {
            Self::MalformedDecision {
                reason, candidate, ..
            } => Self::MalformedDecision {
                reason,
                candidate,
                raw: Some(raw.as_str().to_string()),
            },
            other => other,
        }
    }

    /// Full model output carried by a parse or validation failure.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::NoJsonFound { raw } => Some(raw),
            Self::MalformedDecision { raw, .. } => raw.as_deref(),
            _ => None,
        }
    }

    /// Error category string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Permission(_) => "permission",
            Self::Inference(e) => e.category(),
            Self::NoJsonFound { .. } => "no_json",
            Self::MalformedDecision { .. } => "malformed_decision",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// Whether the model answered but the answer was unusable.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::NoJsonFound { .. } | Self::MalformedDecision { .. }
        )
    }

    /// Single user-visible message for the chat channel.
    pub fn user_message(&self) -> String {
        if self.is_parse_failure() {
            INVALID_RESPONSE_MESSAGE.to_string()
        } else {
            format!("Error processing request: {self}")
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
