//! Chat request/response types and the provider trait.
//!
//! - [`ChatRequest`]: model id plus the ordered messages to send
//! - [`ChatResponse`]: the raw reply, before any validation
//! - [`ChatProvider`]: one round trip to an inference backend
//!
//! # Example
//!
//! ```rust,ignore
//! use cityinfo::prelude::*;
//!
//! let request = ChatRequest::new("llama3.2")
//!     .system("Reply in JSON.")
//!     .user("London");
//!
//! let response = provider.chat(&request).await?;
//! println!("{}", response.text().unwrap_or_default());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::message::{Message, Role};

/// A chat completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier (e.g., "llama3.2").
    #[serde(default)]
    pub model: String,

    /// Conversation messages, in order.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a new request with the specified model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Creates a request with messages.
    #[must_use]
    pub fn with_messages(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Default::default()
        }
    }

    /// Adds a system message.
    #[must_use]
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::system(content));
        self
    }

    /// Adds a user message.
    #[must_use]
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(Message::user(content));
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Message part of a [`ChatResponse`].
///
/// Both fields are optional: a misbehaving server may omit either.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Role reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Token counts reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt.
    pub input_tokens: u32,
    /// Tokens generated.
    pub output_tokens: u32,
}

impl Usage {
    /// Creates usage statistics.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Raw reply from an inference backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated message, if the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ResponseMessage>,

    /// Model identifier used for this response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Why generation stopped (e.g., "stop", "length").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,

    /// Token usage statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Creates a response carrying an assistant message with `content`.
    #[must_use]
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            message: Some(ResponseMessage {
                role: Some(Role::Assistant),
                content: Some(content.into()),
            }),
            ..Default::default()
        }
    }

    /// Creates a response with no message at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Text content of the message, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.as_ref()?.content.as_deref()
    }

    /// JSON rendering used for logs and error reports.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Core trait for inference backends.
///
/// One call, one reply. Implementations must not retry.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat request and wait for the complete reply.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the transport fails or the server replies
    /// with a non-success status.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Name of this provider, used in logs and errors.
    fn provider_name(&self) -> &'static str;

    /// Model used when a caller does not name one.
    fn default_model(&self) -> &str;
}

#[async_trait]
impl<P: ChatProvider + ?Sized> ChatProvider for std::sync::Arc<P> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        (**self).chat(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn default_model(&self) -> &str {
        (**self).default_model()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod chat_request {
        use super::*;

        #[test]
        fn new_creates_with_model() {
            let req = ChatRequest::new("llama3.2");
            assert_eq!(req.model, "llama3.2");
            assert!(req.messages.is_empty());
            assert!(req.temperature.is_none());
        }

        #[test]
        fn builder_keeps_message_order() {
            let req = ChatRequest::new("llama3.2").system("rules").user("Rome");

            assert_eq!(req.messages.len(), 2);
            assert_eq!(req.messages[0].role, Role::System);
            assert_eq!(req.messages[1].role, Role::User);
            assert_eq!(req.messages[1].content, "Rome");
        }

        #[test]
        fn with_messages_sets_both() {
            let req = ChatRequest::with_messages("m", vec![Message::user("hi")]);
            assert_eq!(req.model, "m");
            assert_eq!(req.messages.len(), 1);
        }
    }

    mod chat_response {
        use super::*;

        #[test]
        fn from_text_exposes_text() {
            let resp = ChatResponse::from_text("{}");
            assert_eq!(resp.text(), Some("{}"));
        }

        #[test]
        fn empty_has_no_text() {
            assert!(ChatResponse::empty().text().is_none());
        }

        #[test]
        fn message_without_content_has_no_text() {
            let resp = ChatResponse {
                message: Some(ResponseMessage::default()),
                ..Default::default()
            };
            assert!(resp.text().is_none());
        }

        #[test]
        fn json_rendering_skips_missing_fields() {
            let json = ChatResponse::empty().with_model("m").to_json_string();
            assert_eq!(json, r#"{"model":"m"}"#);
        }
    }
}
