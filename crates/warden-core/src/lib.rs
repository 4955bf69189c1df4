//! # warden-core
//!
//! Foundation types, errors, and logging for the Warden moderation bot.
//!
//! - **Domain types**: [`types::ReportedMessage`], [`types::ContextWindow`],
//!   [`types::Prompt`], [`types::RawResponse`], [`types::Decision`]
//! - **Errors**: [`errors::ModerationError`] pipeline taxonomy and
//!   [`errors::InferenceError`] for backend failures
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber
//! - **Text**: char-boundary-safe previews for log output
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other warden crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod text;
pub mod types;

pub use errors::{InferenceError, ModerationError, ModerationResult};
pub use types::{
    ActionKind, ContextEntry, ContextWindow, Decision, PlatformMessage, Prompt, RawResponse,
    ReportedMessage,
};
