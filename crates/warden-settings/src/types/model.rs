//! Inference backend settings.

use serde::{Deserialize, Serialize};

/// Text-generation model and backend connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    /// Model identifier as known to the backend.
    pub name: String,
    /// Backend base URL.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Context window size passed to the backend.
    pub context_window: u32,
    /// Maximum tokens generated per response.
    pub max_output_tokens: u32,
    /// Whole-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gemma3:12b-it-qat".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.1,
            context_window: 4096,
            max_output_tokens: 4000,
            request_timeout_ms: 300_000,
        }
    }
}
