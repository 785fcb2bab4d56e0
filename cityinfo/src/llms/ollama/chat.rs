//! Ollama ChatProvider implementation.

use async_trait::async_trait;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ResponseMessage, Usage};
use crate::error::LlmError;
use crate::message::Role;

use super::client::Ollama;
use super::types::OllamaChatResponse;

impl Ollama {
    /// Convert the wire response into a [`ChatResponse`].
    ///
    /// Missing pieces stay missing; judging them is the validator's job.
    pub(crate) fn parse_response(response: OllamaChatResponse) -> ChatResponse {
        let message = response.message.map(|m| ResponseMessage {
            role: m.role.as_deref().and_then(|role| match role {
                "system" => Some(Role::System),
                "user" => Some(Role::User),
                "assistant" => Some(Role::Assistant),
                _ => None,
            }),
            content: m.content,
        });

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(input), Some(output)) => Some(Usage::new(input, output)),
            _ => None,
        };

        ChatResponse {
            message,
            model: response.model,
            done_reason: response.done_reason,
            usage,
        }
    }
}

#[async_trait]
impl ChatProvider for Ollama {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.chat_url();
        let body = self.build_body(request);

        tracing::debug!(url = %url, model = %body.model, messages = body.messages.len(), "sending chat request");

        let response = self.client().post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text));
        }

        let response_text = response.text().await?;
        let parsed: OllamaChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid Ollama response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Ok(Self::parse_response(parsed))
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn default_model(&self) -> &str {
        self.model()
    }
}
