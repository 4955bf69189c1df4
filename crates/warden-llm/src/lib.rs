//! # warden-llm
//!
//! Text-generation backend access for the moderation pipeline.
//!
//! - [`InferenceClient`]: the only seam through which prompts reach a model
//! - [`OllamaClient`]: non-streaming client for Ollama's `/api/generate`
//! - [`MockInferenceClient`]: scripted responses for tests
//!
//! ## Crate Position
//!
//! Depends on warden-core. Depended on by warden-moderation and warden-bot.

#![deny(unsafe_code)]

pub mod client;
pub mod mock;
pub mod ollama;

pub use client::InferenceClient;
pub use mock::{MockInferenceClient, MockResponse};
pub use ollama::{InferenceConfig, OllamaClient};
