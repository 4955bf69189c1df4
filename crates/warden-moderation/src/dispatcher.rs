//! Decision dispatch.
//!
//! Maps a [`Decision`] to a channel notification. Only recommends; no mute or
//! ban is ever executed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use warden_core::{ActionKind, Decision, ModerationResult};

/// Write access to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post `text` to `channel_id`.
    async fn send(&self, channel_id: &str, text: &str) -> ModerationResult<()>;
}

/// Human-readable notification for `decision`.
pub fn render_decision(decision: &Decision) -> String {
    let name = &decision.offender_name;
    let headline = match &decision.action {
        ActionKind::None => format!("No action needed against **{name}**."),
        ActionKind::TempMute => format!("Temporary mute recommended for **{name}**."),
        ActionKind::TempBan => format!("Temporary ban recommended for **{name}**."),
        ActionKind::Other(label) => format!("{label} for **{name}**."),
    };
    format!("**Decision**: {headline}\nReason: {}", decision.reason)
}

/// Posts decisions to the originating channel.
#[derive(Clone)]
pub struct ActionDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl ActionDispatcher {
    /// Dispatcher posting through `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Log `decision`, post its notification, and return the posted text.
    pub async fn dispatch(&self, channel_id: &str, decision: &Decision) -> ModerationResult<String> {
        info!(
            offender = %decision.offender_name,
            offender_id = %decision.offender_id,
            action = %decision.action,
            reason = %decision.reason,
            "moderation decision"
        );
        let text = render_decision(decision);
        self.notifier.send(channel_id, &text).await?;
        Ok(text)
    }
}
