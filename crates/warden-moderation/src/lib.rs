//! # warden-moderation
//!
//! The moderation decision pipeline. One evaluation runs these stages in
//! order:
//!
//! 1. [`ContextAssembler`]: fetch the reported message and its neighbors
//! 2. [`PromptBuilder`]: render the policy template and context into a prompt
//! 3. [`warden_llm::InferenceClient`]: generate a raw response
//! 4. [`parser::extract_json`]: pull a JSON candidate out of the response
//! 5. [`validator::validate`]: turn the candidate into a [`warden_core::Decision`]
//! 6. [`ActionDispatcher`]: post the recommendation to the channel
//!
//! [`ModerationService`] wires the stages together and implements
//! [`ModerationCommands`], the single error boundary for chat commands.
//!
//! ## Crate Position
//!
//! Depends on warden-core and warden-llm. Depended on by warden-discord and
//! warden-bot.

#![deny(unsafe_code)]

pub mod context;
pub mod dispatcher;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod validator;

pub use context::{ContextAssembler, MessageSource};
pub use dispatcher::{ActionDispatcher, Notifier, render_decision};
pub use parser::{ExtractionStrategy, extract_json};
pub use pipeline::{
    ANALYSIS_NOTICE, CommandInvocation, ModerationCommands, ModerationService, USAGE_MESSAGE,
};
pub use prompt::{DEFAULT_POLICY_TEMPLATE, PromptBuilder, build_prompt};
pub use validator::validate;
