//! Context assembly.
//!
//! Fetches the reported message and a bounded window of its neighbors from
//! the chat platform through the [`MessageSource`] port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use warden_core::types::{CONTEXT_FETCH_LIMIT, CONTEXT_WINDOW_LIMIT};
use warden_core::{
    ContextEntry, ContextWindow, ModerationResult, PlatformMessage, ReportedMessage,
};

/// Read access to channel messages on the host platform.
///
/// Implementations map a deleted message to `ModerationError::NotFound` and
/// missing read access to `ModerationError::Permission`.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch a single message.
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> ModerationResult<PlatformMessage>;

    /// Up to `limit` messages around `message_id`, in platform order.
    async fn history_around(
        &self,
        channel_id: &str,
        message_id: &str,
        limit: usize,
    ) -> ModerationResult<Vec<PlatformMessage>>;
}

/// Builds the reported message and its context window.
#[derive(Clone)]
pub struct ContextAssembler {
    source: Arc<dyn MessageSource>,
}

impl ContextAssembler {
    /// Assembler reading from `source`.
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self { source }
    }

    /// Fetch the reported message and the messages around it.
    ///
    /// Errors from the platform are surfaced unchanged and never retried.
    pub async fn assemble(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> ModerationResult<(ReportedMessage, ContextWindow)> {
        let reported = self.source.fetch_message(channel_id, message_id).await?;
        let candidates = self
            .source
            .history_around(channel_id, &reported.id, CONTEXT_FETCH_LIMIT)
            .await?;
        let window = select_context(&reported.id, &candidates);

        debug!(
            channel_id,
            message_id,
            candidates = candidates.len(),
            kept = window.len(),
            "assembled context"
        );

        Ok((ReportedMessage::from(&reported), window))
    }
}

/// Keep the first [`CONTEXT_WINDOW_LIMIT`] candidates whose id differs from
/// `reported_id`, preserving order.
pub fn select_context(reported_id: &str, candidates: &[PlatformMessage]) -> ContextWindow {
    ContextWindow::new(
        candidates
            .iter()
            .filter(|msg| msg.id != reported_id)
            .take(CONTEXT_WINDOW_LIMIT)
            .map(ContextEntry::from)
            .collect(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
