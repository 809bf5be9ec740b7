//! Scripted story provider for tests and offline runs.
//!
//! Replies are played back in the order they were scripted; once the script
//! runs out every call gets a short placeholder story. Each request is kept
//! so tests can read the prompt that went out.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const PLACEHOLDER_STORY: &str = "# Mock Story\n\nA life, told by a mock.";
const MOCK_MODEL: &str = "mock-model-1";

/// Failures a scripted reply can stand in for.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

#[derive(Debug)]
enum Reply {
    Story(String, FinishReason),
    Fail(MockError),
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    seen: Vec<CompletionRequest>,
}

/// In-process [`AIProvider`] driven by a reply script.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<Script>>,
    latency: Duration,
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a story that ends naturally.
    pub fn with_response(self, story: impl Into<String>) -> Self {
        self.push(Reply::Story(story.into(), FinishReason::Stop))
    }

    /// Scripts a story cut off by the output limit.
    pub fn with_truncated_response(self, story: impl Into<String>) -> Self {
        self.push(Reply::Story(story.into(), FinishReason::Length))
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.push(Reply::Fail(error))
    }

    /// Holds every call for `latency` before answering.
    pub fn with_delay(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.script().seen.len()
    }

    pub fn last_call(&self) -> Option<CompletionRequest> {
        self.script().seen.last().cloned()
    }

    fn push(self, reply: Reply) -> Self {
        self.script().replies.push_back(reply);
        self
    }

    // A test that panicked while holding the lock must not poison the rest.
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let reply = {
            let mut script = self.script();
            script.seen.push(request);
            script.replies.pop_front()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let (content, finish_reason) = match reply {
            Some(Reply::Story(content, finish_reason)) => (content, finish_reason),
            Some(Reply::Fail(err)) => return Err(err.into()),
            None => (PLACEHOLDER_STORY.to_string(), FinishReason::Stop),
        };

        Ok(CompletionResponse {
            usage: TokenUsage::new(prompt_tokens, (content.len() / 4) as u32),
            content,
            model: MOCK_MODEL.to_string(),
            finish_reason,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", MOCK_MODEL)
    }
}
