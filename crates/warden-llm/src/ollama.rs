//! Ollama backend.
//!
//! Sends non-streaming requests to `/api/generate` and returns the `response`
//! text verbatim. Sampling options are fixed per process.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use warden_core::text::preview;
use warden_core::{InferenceError, Prompt, RawResponse};

use crate::client::InferenceClient;

/// Characters of raw output shown in debug logs.
const RESPONSE_PREVIEW_CHARS: usize = 100;

/// Backend connection and sampling options.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceConfig {
    /// Backend base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Context window size. Enforcement is left to the backend.
    pub num_ctx: u32,
    /// Output token cap.
    pub num_predict: u32,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gemma3:12b-it-qat".to_string(),
            temperature: 0.1,
            num_ctx: 4096,
            num_predict: 4000,
            timeout: Duration::from_secs(300),
        }
    }
}

// -- Ollama API request/response types --

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: GenerateOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_ctx: u32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// [`InferenceClient`] for a local or remote Ollama instance.
pub struct OllamaClient {
    client: Client,
    config: InferenceConfig,
}

impl OllamaClient {
    /// Build a client. Fails only if the HTTP client cannot be constructed.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                InferenceError::Connection(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            prompt: prompt.as_str(),
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_ctx: self.config.num_ctx,
                num_predict: self.config.num_predict,
            },
            stream: false,
        }
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn invoke(&self, prompt: &Prompt) -> Result<RawResponse, InferenceError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| InferenceError::Connection(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: preview(body.trim(), 256),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            InferenceError::InvalidResponse(format!("failed to parse Ollama response: {e}"))
        })?;

        debug!(
            served_by = body.model.as_deref().unwrap_or("unknown"),
            input_tokens = body.prompt_eval_count.unwrap_or(0),
            output_tokens = body.eval_count.unwrap_or(0),
            preview = %preview(&body.response, RESPONSE_PREVIEW_CHARS),
            "raw model response"
        );

        Ok(RawResponse::new(body.response))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
