//! Scripted inference client for deterministic tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use warden_core::{InferenceError, Prompt, RawResponse};

use crate::client::InferenceClient;

/// Pre-programmed response for one call.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Error(InferenceError),
    /// Wait, then resolve the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    /// Text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Wrap any response with a delay.
    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Returns pre-programmed responses in sequence and records every prompt.
pub struct MockInferenceClient {
    responses: Vec<MockResponse>,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockInferenceClient {
    /// Client answering calls with `responses`, in order.
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client answering every call with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![MockResponse::text(text)])
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn invoke(&self, prompt: &Prompt) -> Result<RawResponse, InferenceError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.as_str().to_string());
        }

        // A single scripted response repeats for every call.
        let scripted = match self.responses.as_slice() {
            [only] => Some(only),
            many => many.get(idx),
        };
        let Some(mut current) = scripted.cloned() else {
            return Err(InferenceError::InvalidResponse(format!(
                "MockInferenceClient: no response configured for call {idx}"
            )));
        };

        loop {
            match current {
                MockResponse::Text(text) => return Ok(RawResponse::new(text)),
                MockResponse::Error(e) => return Err(e),
                MockResponse::Delay(duration, inner) => {
                    tokio::time::sleep(duration).await;
                    current = *inner;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn returns_responses_in_order() {
        let mock = MockInferenceClient::new(vec![
            MockResponse::text("first"),
            MockResponse::Error(InferenceError::Connection("down".into())),
        ]);
        let prompt = Prompt::new("p");
        assert_eq!(mock.invoke(&prompt).await.unwrap().as_str(), "first");
        assert_matches!(
            mock.invoke(&prompt).await,
            Err(InferenceError::Connection(_))
        );
        assert_matches!(
            mock.invoke(&prompt).await,
            Err(InferenceError::InvalidResponse(_))
        );
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn single_response_repeats() {
        let mock = MockInferenceClient::always("ok");
        for _ in 0..3 {
            assert_eq!(mock.invoke(&Prompt::new("x")).await.unwrap().as_str(), "ok");
        }
    }

    #[tokio::test]
    async fn records_prompts() {
        let mock = MockInferenceClient::always("ok");
        let _ = mock.invoke(&Prompt::new("hello")).await;
        assert_eq!(mock.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn delay_resolves_inner() {
        let delayed = MockInferenceClient::new(vec![MockResponse::delayed(
            Duration::from_millis(5),
            MockResponse::text("late"),
        )]);
        assert_eq!(
            delayed.invoke(&Prompt::new("x")).await.unwrap().as_str(),
            "late"
        );
    }

    #[tokio::test]
    async fn test_connection_reports_failure() {
        let mock = MockInferenceClient::new(vec![MockResponse::Error(
            InferenceError::Connection("refused".into()),
        )]);
        assert!(!mock.test_connection().await);
        assert_eq!(mock.prompts(), vec!["test".to_string()]);
    }

    #[tokio::test]
    async fn test_connection_reports_success() {
        let mock = MockInferenceClient::always("hi");
        assert!(mock.test_connection().await);
    }
}
