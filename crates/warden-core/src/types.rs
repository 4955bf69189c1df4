//! Domain types for a single moderation evaluation.
//!
//! Every value here is created per `remove` invocation and dropped once the
//! decision has been dispatched. Nothing is shared between evaluations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason recorded when the model does not provide one.
pub const DEFAULT_REASON: &str = "Not specified";

/// Maximum number of surrounding messages kept in a [`ContextWindow`].
pub const CONTEXT_WINDOW_LIMIT: usize = 10;

/// Number of candidate messages requested around the reported message.
pub const CONTEXT_FETCH_LIMIT: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// Platform messages
// ─────────────────────────────────────────────────────────────────────────────

/// A chat message as returned by the host platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMessage {
    /// Platform message identifier.
    pub id: String,
    /// Platform identifier of the author.
    pub author_id: String,
    /// Display name of the author.
    pub author_name: String,
    /// Full message text.
    pub content: String,
}

/// The message under evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedMessage {
    /// Display name of the offender.
    pub author_name: String,
    /// Platform identifier of the offender.
    pub author_id: String,
    /// Full message text.
    pub content: String,
}

impl From<&PlatformMessage> for ReportedMessage {
    fn from(msg: &PlatformMessage) -> Self {
        Self {
            author_name: msg.author_name.clone(),
            author_id: msg.author_id.clone(),
            content: msg.content.clone(),
        }
    }
}

/// One surrounding message, reduced to what the prompt needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    /// Display name of the author.
    pub author_name: String,
    /// Full message text.
    pub content: String,
}

impl From<&PlatformMessage> for ContextEntry {
    fn from(msg: &PlatformMessage) -> Self {
        Self {
            author_name: msg.author_name.clone(),
            content: msg.content.clone(),
        }
    }
}

/// Ordered messages surrounding a reported message, in platform order.
///
/// Holds at most [`CONTEXT_WINDOW_LIMIT`] entries. The reported message is
/// never part of the window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContextWindow {
    entries: Vec<ContextEntry>,
}

impl ContextWindow {
    /// Build a window, keeping the first [`CONTEXT_WINDOW_LIMIT`] entries.
    pub fn new(mut entries: Vec<ContextEntry>) -> Self {
        entries.truncate(CONTEXT_WINDOW_LIMIT);
        Self { entries }
    }

    /// Entries in platform order.
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompt / response
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluation prompt sent to the inference backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// Wrap prompt text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unprocessed text returned by the inference backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse(String);

impl RawResponse {
    /// Wrap response text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Response text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decisions
// ─────────────────────────────────────────────────────────────────────────────

/// Recommended moderation action.
///
/// Labels outside the recognized set are kept verbatim in [`ActionKind::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// No violation.
    None,
    /// Temporary mute recommended.
    TempMute,
    /// Temporary ban recommended.
    TempBan,
    /// Unrecognized label, carried verbatim.
    Other(String),
}

impl ActionKind {
    /// Map a model-provided label to an action. Matching is exact.
    pub fn from_label(label: &str) -> Self {
        match label {
            "none" => Self::None,
            "temp-mute" => Self::TempMute,
            "temp-ban" => Self::TempBan,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire label of this action.
    pub fn label(&self) -> &str {
        match self {
            Self::None => "none",
            Self::TempMute => "temp-mute",
            Self::TempBan => "temp-ban",
            Self::Other(label) => label,
        }
    }

    /// Whether the label belongs to the recognized set.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for ActionKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ActionKind> for String {
    fn from(action: ActionKind) -> Self {
        action.label().to_string()
    }
}

/// Canonical, validated moderation decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Recommended action.
    pub action: ActionKind,
    /// Model-provided justification, or [`DEFAULT_REASON`].
    pub reason: String,
    /// Offender display name, taken from the reported message.
    pub offender_name: String,
    /// Offender identifier, taken from the reported message.
    pub offender_id: String,
}

impl Decision {
    /// Build a decision about `offender`. A missing reason becomes [`DEFAULT_REASON`].
    pub fn new(action: ActionKind, reason: Option<String>, offender: &ReportedMessage) -> Self {
        Self {
            action,
            reason: reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
            offender_name: offender.author_name.clone(),
            offender_id: offender.author_id.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
