//! # warden-discord
//!
//! Discord adapter for the moderation pipeline.
//!
//! - [`DiscordClient`]: REST client implementing the pipeline's
//!   [`MessageSource`](warden_moderation::MessageSource) and
//!   [`Notifier`](warden_moderation::Notifier) ports
//! - [`build_ingress_app`]: `axum` router receiving `MESSAGE_CREATE` events
//!   from a gateway bridge and dispatching commands
//! - [`parse_command`]: pure prefix-command parsing
//!
//! ## Crate Position
//!
//! Depends on warden-core and warden-moderation. Depended on by warden-bot.

#![deny(unsafe_code)]

pub mod client;
pub mod command;
pub mod constants;
pub mod ingress;
pub mod split;

pub use client::DiscordClient;
pub use command::{Command, parse_command};
pub use ingress::{IngressApp, IngressConfig, build_ingress_app};
pub use split::split_message;
