//! # Inference Client Trait
//!
//! Every backend implements [`InferenceClient`]. The pipeline holds it as
//! `Arc<dyn InferenceClient>` so tests can swap in a scripted fake.

use async_trait::async_trait;
use tracing::{error, info};
use warden_core::{InferenceError, Prompt, RawResponse};

/// Prompt sent by [`InferenceClient::test_connection`].
pub const PROBE_PROMPT: &str = "test";

/// Sends one prompt to a text-generation backend and returns its raw output.
///
/// Configuration (endpoint, model, sampling options) is fixed at construction.
/// Implementations never retry.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Model identifier used for every call.
    fn model(&self) -> &str;

    /// Generate a response for `prompt`.
    async fn invoke(&self, prompt: &Prompt) -> Result<RawResponse, InferenceError>;

    /// Send a trivial prompt and report whether the backend answered.
    ///
    /// Also loads the model so the first real evaluation is not slowed down.
    async fn test_connection(&self) -> bool {
        match self.invoke(&Prompt::new(PROBE_PROMPT)).await {
            Ok(_) => {
                info!(model = self.model(), "connected to inference backend");
                true
            }
            Err(e) => {
                error!(
                    model = self.model(),
                    category = e.category(),
                    error = %e,
                    "failed to connect to inference backend"
                );
                if e.is_model_missing() {
                    error!(
                        model = self.model(),
                        "model is not available; pull it on the backend first"
                    );
                } else {
                    error!("make sure the inference backend is running and reachable");
                }
                false
            }
        }
    }
}
