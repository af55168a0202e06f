//! Scripted mock provider for tests and offline demos.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use echomind_core::{AppError, AppResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Mock LLM client that returns a scripted reply.
///
/// Tracks how many completions were requested and can be flipped into a
/// failing state to exercise fallback paths.
pub struct MockClient {
    reply: String,
    call_count: AtomicUsize,
    fail: AtomicBool,
}

impl MockClient {
    /// Create a mock that always answers with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            call_count: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent completion fail with `GenerationUnavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of completions requested so far (including failed ones).
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("This is a mock response.")
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::GenerationUnavailable(
                "Mock provider set to fail".to_string(),
            ));
        }

        Ok(LlmResponse {
            content: self.reply.clone(),
            model: request.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replies_and_counts() {
        let client = MockClient::new("hello");
        let request = LlmRequest::new("anything", "mock-model");

        let response = client.complete(&request).await.unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_mode() {
        let client = MockClient::default();
        client.set_failing(true);

        let request = LlmRequest::new("anything", "mock-model");
        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, AppError::GenerationUnavailable(_)));
        assert_eq!(client.call_count(), 1);
    }
}
