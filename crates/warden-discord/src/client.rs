//! Discord REST client.
//!
//! Implements the pipeline ports against the Discord HTTP API:
//! - [`MessageSource`]: `GET channels/{id}/messages/{id}` and
//!   `GET channels/{id}/messages?around={id}&limit={n}`
//! - [`Notifier`]: `POST channels/{id}/messages`, split into 2000-character chunks
//!
//! Status mapping: 404 on a message is `NotFound` and 401/403 are
//! `Permission`. Anything else, including a missing channel, is `Unexpected`
//! with a body preview.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use warden_core::text::preview;
use warden_core::{ModerationError, ModerationResult, PlatformMessage};
use warden_moderation::{MessageSource, Notifier};

use crate::constants::{DEFAULT_API_BASE, ERROR_BODY_PREVIEW_CHARS, MAX_MESSAGE_LENGTH};
use crate::split::split_message;

/// What a request addressed, for 404 mapping.
#[derive(Clone, Copy, Debug)]
enum Resource<'a> {
    Message(&'a str),
    Channel(&'a str),
}

// -- Discord API response types --

#[derive(Debug, Deserialize)]
struct DiscordMessage {
    id: String,
    #[serde(default)]
    content: String,
    author: DiscordUser,
}

#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
}

impl From<DiscordMessage> for PlatformMessage {
    fn from(msg: DiscordMessage) -> Self {
        Self {
            id: msg.id,
            author_id: msg.author.id,
            author_name: msg.author.username,
            content: msg.content,
        }
    }
}

/// Discord REST client authenticated as a bot.
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl DiscordClient {
    /// Client against the public Discord API.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self::with_api_base(bot_token, DEFAULT_API_BASE)
    }

    /// Client against a custom API base.
    pub fn with_api_base(bot_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
        resource: Resource<'_>,
    ) -> ModerationResult<T> {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .query(query)
            .send()
            .await
            .map_err(|e| ModerationError::Unexpected(format!("discord request failed: {e}")))?;
        let response = check_status(response, resource).await?;
        response
            .json()
            .await
            .map_err(|e| ModerationError::Unexpected(format!("invalid discord response: {e}")))
    }

    /// Post `text` to `channel_id`, split into Discord-sized chunks.
    pub async fn send_text(&self, channel_id: &str, text: &str) -> ModerationResult<()> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(ModerationError::Unexpected(
                "discord channel id cannot be empty".to_string(),
            ));
        }

        for chunk in split_message(text, MAX_MESSAGE_LENGTH) {
            let response = self
                .client
                .post(self.api_url(&format!("channels/{channel_id}/messages")))
                .header("Authorization", self.auth_header())
                .json(&json!({ "content": chunk }))
                .send()
                .await
                .map_err(|e| ModerationError::Unexpected(format!("discord send failed: {e}")))?;
            let _ = check_status(response, Resource::Channel(channel_id)).await?;
        }
        debug!(channel_id, chars = text.chars().count(), "sent discord message");
        Ok(())
    }
}

/// Map a non-success response to the pipeline taxonomy.
async fn check_status(response: Response, resource: Resource<'_>) -> ModerationResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = preview(&body, ERROR_BODY_PREVIEW_CHARS);
    Err(match (status, resource) {
        (StatusCode::NOT_FOUND, Resource::Message(id)) => ModerationError::NotFound {
            message_id: id.to_string(),
        },
        (StatusCode::NOT_FOUND, Resource::Channel(id)) => {
            ModerationError::Unexpected(format!("discord channel {id} not found: {body}"))
        }
        (StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED, _) => {
            ModerationError::Permission(format!("discord returned {status}: {body}"))
        }
        _ => ModerationError::Unexpected(format!(
            "discord request failed: status={status} body={body}"
        )),
    })
}

#[async_trait]
impl MessageSource for DiscordClient {
    async fn fetch_message(
        &self,
        channel_id: &str,
        message_id: &str,
    ) -> ModerationResult<PlatformMessage> {
        let url = self.api_url(&format!("channels/{channel_id}/messages/{message_id}"));
        let msg: DiscordMessage = self
            .get_json(url, &[], Resource::Message(message_id))
            .await?;
        Ok(msg.into())
    }

    async fn history_around(
        &self,
        channel_id: &str,
        message_id: &str,
        limit: usize,
    ) -> ModerationResult<Vec<PlatformMessage>> {
        let url = self.api_url(&format!("channels/{channel_id}/messages"));
        let query = [("around", message_id.to_string()), ("limit", limit.to_string())];
        let messages: Vec<DiscordMessage> = self
            .get_json(url, &query, Resource::Message(message_id))
            .await?;
        Ok(messages.into_iter().map(PlatformMessage::from).collect())
    }
}

#[async_trait]
impl Notifier for DiscordClient {
    async fn send(&self, channel_id: &str, text: &str) -> ModerationResult<()> {
        self.send_text(channel_id, text).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
