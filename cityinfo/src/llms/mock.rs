//! Mock provider for testing.
//!
//! Returns predefined replies without touching the network, and records
//! every request it receives so tests can inspect the prompt.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::LlmError;

/// A provider that replays canned replies.
///
/// Replies are returned in sequence, cycling once exhausted.
///
/// # Example
///
/// ```rust,ignore
/// use cityinfo::prelude::*;
///
/// let provider = MockProvider::with_text(r#"{"city":"London","industry":"Finance","fun":"Museums"}"#);
/// let guide = CityGuide::new(provider);
/// let info = guide.lookup("London").await?;
/// ```
#[derive(Debug)]
pub struct MockProvider {
    model: String,
    replies: Vec<Result<ChatResponse, LlmError>>,
    index: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    /// Create a mock with predefined replies.
    #[must_use]
    pub fn new(replies: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            model: "mock-model".to_owned(),
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always answers with `content` as message text.
    #[must_use]
    pub fn with_text(content: impl Into<String>) -> Self {
        Self::new(vec![Ok(ChatResponse::from_text(content))])
    }

    /// Create a mock that always fails with `error`.
    #[must_use]
    pub fn failing(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Set the model id reported by [`ChatProvider::default_model`].
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if self.replies.is_empty() {
            return Err(LlmError::internal("mock provider has no replies configured"));
        }

        let index = self.index.fetch_add(1, Ordering::SeqCst);
        self.replies[index % self.replies.len()].clone()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
