#![allow(missing_docs, unused_results)]

//! Ingress router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tokio::sync::mpsc;
use tower::util::ServiceExt;
use warden_core::ModerationResult;
use warden_discord::{IngressConfig, build_ingress_app};
use warden_moderation::{CommandInvocation, ModerationCommands, Notifier};

const SECRET_HEADER: &str = "x-warden-ingress-token";

struct RecordingCommands {
    tx: mpsc::UnboundedSender<CommandInvocation>,
}

#[async_trait]
impl ModerationCommands for RecordingCommands {
    async fn remove(&self, invocation: CommandInvocation) {
        let _ = self.tx.send(invocation);
    }
}

struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(String, String)>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel_id: &str, text: &str) -> ModerationResult<()> {
        let _ = self.tx.send((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

struct Harness {
    app: Router,
    path: String,
    invocations: mpsc::UnboundedReceiver<CommandInvocation>,
    notices: mpsc::UnboundedReceiver<(String, String)>,
}

fn harness(secret: Option<&str>, moderators: &[&str]) -> Harness {
    let (cmd_tx, invocations) = mpsc::unbounded_channel();
    let (note_tx, notices) = mpsc::unbounded_channel();
    let ingress = build_ingress_app(
        Arc::new(RecordingCommands { tx: cmd_tx }),
        Arc::new(RecordingNotifier { tx: note_tx }),
        IngressConfig {
            path: "/discord/ingress".into(),
            secret: secret.map(str::to_string),
            command_prefix: "!".into(),
            moderators: moderators.iter().map(ToString::to_string).collect(),
        },
    );
    Harness {
        app: ingress.app,
        path: ingress.path,
        invocations,
        notices,
    }
}

fn message_event(content: &str, author_id: &str, reply_to: Option<&str>) -> serde_json::Value {
    let mut event = serde_json::json!({
        "id": "9001",
        "channel_id": "chan-1",
        "guild_id": "guild-1",
        "content": content,
        "author": {"id": author_id, "username": format!("name-{author_id}")}
    });
    if let Some(target) = reply_to {
        event["message_reference"] = serde_json::json!({"message_id": target});
    }
    event
}

async fn post_event(
    app: Router,
    path: &str,
    payload: serde_json::Value,
    secret: Option<&str>,
) -> StatusCode {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_HEADER, secret);
    }
    let request = builder.body(Body::from(payload.to_string())).unwrap();
    app.oneshot(request).await.unwrap().status()
}

async fn recv<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Option<T> {
    tokio::time::timeout(Duration::from_millis(200), rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn remove_reply_is_dispatched() {
    let mut h = harness(None, &["*"]);
    let status = post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "mod-7", Some("bad-msg")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let invocation = recv(&mut h.invocations).await.unwrap();
    assert_eq!(invocation.channel_id, "chan-1");
    assert_eq!(invocation.invoker_id, "mod-7");
    assert_eq!(invocation.reply_to.as_deref(), Some("bad-msg"));
}

#[tokio::test]
async fn remove_without_reply_still_dispatched() {
    let mut h = harness(None, &["*"]);
    post_event(h.app.clone(), &h.path, message_event("!remove", "m", None), None).await;
    let invocation = recv(&mut h.invocations).await.unwrap();
    assert!(invocation.reply_to.is_none());
}

#[tokio::test]
async fn gateway_envelope_accepted() {
    let mut h = harness(None, &["*"]);
    let event = serde_json::json!({
        "op": 0,
        "t": "MESSAGE_CREATE",
        "s": 42,
        "d": message_event("!remove", "m", Some("x"))
    });
    let status = post_event(h.app.clone(), &h.path, event, None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(recv(&mut h.invocations).await.is_some());
}

#[tokio::test]
async fn invalid_secret_rejected() {
    let mut h = harness(Some("expected"), &["*"]);
    let status = post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "m", Some("x")),
        Some("wrong"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(recv(&mut h.invocations).await.is_none());
}

#[tokio::test]
async fn valid_secret_accepted() {
    let mut h = harness(Some("expected"), &["*"]);
    let status = post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "m", Some("x")),
        Some("expected"),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(recv(&mut h.invocations).await.is_some());
}

#[tokio::test]
async fn blank_secret_rejects_requests_without_header() {
    let mut h = harness(Some(""), &["*"]);
    let status = post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "m", Some("x")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let status = post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "m", Some("x")),
        Some(""),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(recv(&mut h.invocations).await.is_none());
}

#[tokio::test]
async fn non_moderator_denied() {
    let mut h = harness(None, &["mod-1"]);
    post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "random", Some("x")),
        None,
    )
    .await;

    let (channel, text) = recv(&mut h.notices).await.unwrap();
    assert_eq!(channel, "chan-1");
    assert_eq!(text, "You don't have permission to use this command!");
    assert!(recv(&mut h.invocations).await.is_none());
}

#[tokio::test]
async fn moderator_matched_by_username() {
    let mut h = harness(None, &["name-alice"]);
    post_event(
        h.app.clone(),
        &h.path,
        message_event("!remove", "alice", Some("x")),
        None,
    )
    .await;
    assert!(recv(&mut h.invocations).await.is_some());
}

#[tokio::test]
async fn unknown_command_answered() {
    let mut h = harness(None, &["*"]);
    post_event(h.app.clone(), &h.path, message_event("!kick", "m", None), None).await;

    let (_, text) = recv(&mut h.notices).await.unwrap();
    assert_eq!(text, "Command not found. Available commands: `!remove`");
    assert!(recv(&mut h.invocations).await.is_none());
}

#[tokio::test]
async fn plain_messages_and_bots_ignored() {
    let mut h = harness(None, &["*"]);
    let status = post_event(h.app.clone(), &h.path, message_event("hello", "m", None), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut bot_event = message_event("!remove", "bot-1", Some("x"));
    bot_event["author"]["bot"] = serde_json::json!(true);
    let status = post_event(h.app.clone(), &h.path, bot_event, None).await;
    assert_eq!(status, StatusCode::OK);

    assert!(recv(&mut h.invocations).await.is_none());
    assert!(recv(&mut h.notices).await.is_none());
}

#[tokio::test]
async fn non_message_events_ignored() {
    let h = harness(None, &["*"]);
    let event = serde_json::json!({"t": "GUILD_CREATE", "d": {"id": "g"}});
    assert_eq!(post_event(h.app.clone(), &h.path, event, None).await, StatusCode::OK);
}
