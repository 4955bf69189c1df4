//! Command ingress.
//!
//! A gateway bridge holds the Discord websocket and forwards `MESSAGE_CREATE`
//! events here as JSON, either as the bare message object or wrapped in the
//! gateway envelope (`{"t": "MESSAGE_CREATE", "d": {...}}`). Each accepted
//! `remove` command runs on its own task; the handler returns immediately.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use warden_moderation::{CommandInvocation, ModerationCommands, Notifier};

use crate::command::{Command, parse_command, unknown_command_message};
use crate::constants::{DEFAULT_INGRESS_PATH, INGRESS_SECRET_HEADER, PERMISSION_DENIED_MESSAGE};

/// Ingress behavior.
#[derive(Clone, Debug)]
pub struct IngressConfig {
    /// Route path. Blank means [`DEFAULT_INGRESS_PATH`].
    pub path: String,
    /// Expected value of the secret header, if any. A blank value rejects
    /// every request.
    pub secret: Option<String>,
    /// Command prefix, e.g. `!`.
    pub command_prefix: String,
    /// User ids or usernames allowed to run commands. `*` allows everyone.
    pub moderators: Vec<String>,
}

impl IngressConfig {
    fn is_moderator(&self, user_id: &str, username: &str) -> bool {
        self.moderators
            .iter()
            .map(|entry| entry.trim())
            .any(|entry| {
                entry == "*" || entry == user_id || (!username.is_empty() && entry == username)
            })
    }
}

/// Built ingress router and its normalized route path.
pub struct IngressApp {
    /// Router serving the ingress endpoint.
    pub app: Router,
    /// Normalized route path.
    pub path: String,
}

#[derive(Clone)]
struct IngressState {
    commands: Arc<dyn ModerationCommands>,
    notifier: Arc<dyn Notifier>,
    config: Arc<IngressConfig>,
}

// -- Gateway payload types --

#[derive(Debug, Deserialize)]
struct GatewayMessage {
    channel_id: String,
    #[serde(default)]
    content: String,
    author: GatewayAuthor,
    #[serde(default)]
    message_reference: Option<MessageReference>,
}

#[derive(Debug, Deserialize)]
struct GatewayAuthor {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    bot: bool,
}

#[derive(Debug, Deserialize)]
struct MessageReference {
    #[serde(default)]
    message_id: Option<String>,
}

/// Build the ingress router.
pub fn build_ingress_app(
    commands: Arc<dyn ModerationCommands>,
    notifier: Arc<dyn Notifier>,
    config: IngressConfig,
) -> IngressApp {
    let path = normalize_ingress_path(&config.path);
    let state = IngressState {
        commands,
        notifier,
        config: Arc::new(config),
    };
    let app = Router::new()
        .route(&path, post(ingress_handler))
        .with_state(state);
    IngressApp { app, path }
}

fn normalize_ingress_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        DEFAULT_INGRESS_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Unwrap the gateway envelope and decode the message, if this is one.
fn parse_gateway_message(event: Value) -> Option<GatewayMessage> {
    let payload = match event.get("t").map(|t| t.as_str() == Some("MESSAGE_CREATE")) {
        Some(true) => event.get("d")?.clone(),
        Some(false) => return None,
        None => event,
    };
    serde_json::from_value(payload).ok()
}

async fn ingress_handler(
    State(state): State<IngressState>,
    headers: HeaderMap,
    Json(event): Json<Value>,
) -> Result<StatusCode, (StatusCode, String)> {
    // A configured but blank secret matches nothing.
    if let Some(expected) = state.config.secret.as_deref() {
        let provided = headers
            .get(INGRESS_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if expected.trim().is_empty() || provided != expected {
            return Err((
                StatusCode::UNAUTHORIZED,
                "invalid ingress secret token".to_string(),
            ));
        }
    }

    let Some(msg) = parse_gateway_message(event) else {
        debug!("ingress ignored non-message event");
        return Ok(StatusCode::OK);
    };
    if msg.author.bot {
        return Ok(StatusCode::OK);
    }
    let prefix = state.config.command_prefix.as_str();
    let Some(command) = parse_command(prefix, &msg.content) else {
        return Ok(StatusCode::OK);
    };

    match command {
        Command::Unknown(name) => {
            info!(command = %name, channel_id = %msg.channel_id, "unknown command");
            spawn_notice(&state, msg.channel_id, unknown_command_message(prefix));
        }
        Command::Remove if !state.config.is_moderator(&msg.author.id, &msg.author.username) => {
            warn!(
                user_id = %msg.author.id,
                username = %msg.author.username,
                channel_id = %msg.channel_id,
                "remove command from non-moderator"
            );
            spawn_notice(&state, msg.channel_id, PERMISSION_DENIED_MESSAGE.to_string());
        }
        Command::Remove => {
            let invocation = CommandInvocation {
                channel_id: msg.channel_id,
                invoker_id: msg.author.id,
                reply_to: msg.message_reference.and_then(|r| r.message_id),
            };
            let commands = Arc::clone(&state.commands);
            let _ = tokio::spawn(async move { commands.remove(invocation).await });
        }
    }

    Ok(StatusCode::ACCEPTED)
}

fn spawn_notice(state: &IngressState, channel_id: String, text: String) {
    let notifier = Arc::clone(&state.notifier);
    let _ = tokio::spawn(async move {
        if let Err(e) = notifier.send(&channel_id, &text).await {
            warn!(error = %e, channel_id = %channel_id, "failed to post notice");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(moderators: &[&str]) -> IngressConfig {
        IngressConfig {
            path: String::new(),
            secret: None,
            command_prefix: "!".into(),
            moderators: moderators.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn normalizes_path() {
        assert_eq!(normalize_ingress_path(""), "/discord/ingress");
        assert_eq!(normalize_ingress_path("hooks/discord"), "/hooks/discord");
        assert_eq!(normalize_ingress_path(" /x "), "/x");
    }

    #[test]
    fn moderator_matching() {
        assert!(config(&["*"]).is_moderator("1", "alice"));
        assert!(config(&["1"]).is_moderator("1", "alice"));
        assert!(config(&["alice"]).is_moderator("1", "alice"));
        assert!(!config(&["bob"]).is_moderator("1", "alice"));
        assert!(!config(&[]).is_moderator("1", "alice"));
        assert!(!config(&[""]).is_moderator("1", ""));
    }

    #[test]
    fn parses_bare_and_enveloped_messages() {
        let bare = serde_json::json!({
            "id": "1", "channel_id": "c", "content": "!remove",
            "author": {"id": "u", "username": "alice"},
            "message_reference": {"message_id": "target"}
        });
        let msg = parse_gateway_message(bare.clone()).unwrap();
        assert_eq!(msg.channel_id, "c");
        assert_eq!(msg.message_reference.unwrap().message_id.as_deref(), Some("target"));

        let wrapped = serde_json::json!({"op": 0, "t": "MESSAGE_CREATE", "d": bare});
        assert!(parse_gateway_message(wrapped).is_some());

        let other = serde_json::json!({"op": 0, "t": "TYPING_START", "d": {}});
        assert!(parse_gateway_message(other).is_none());
    }

    #[test]
    fn rejects_incomplete_payload() {
        assert!(parse_gateway_message(serde_json::json!({"content": "!remove"})).is_none());
    }
}
