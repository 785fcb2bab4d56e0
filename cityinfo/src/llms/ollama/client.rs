//! Ollama API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::chat::ChatRequest;
use crate::error::LlmError;
use crate::message::Message;

use super::config::OllamaConfig;
use super::types::{OllamaChatRequest, OllamaErrorResponse, OllamaMessage, OllamaOptions};

/// Ollama API client.
#[derive(Debug, Clone)]
pub struct Ollama {
    pub(crate) config: Arc<OllamaConfig>,
    pub(crate) http_client: Client,
}

impl Ollama {
    /// Create a new Ollama client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an internal [`LlmError`] if the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let http_client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    /// Create a client with default configuration.
    ///
    /// # Errors
    ///
    /// See [`Ollama::new`].
    pub fn with_defaults() -> Result<Self, LlmError> {
        Self::new(OllamaConfig::default())
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// See [`Ollama::new`].
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(OllamaConfig::from_env())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get a reference to the HTTP client.
    #[must_use]
    pub(crate) const fn client(&self) -> &Client {
        &self.http_client
    }

    /// Build the chat API URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }

    pub(crate) fn convert_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }

    /// Build the request body. Always non-streaming, never sets `format`.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> OllamaChatRequest {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        };

        let options = request.temperature.map(|t| OllamaOptions {
            temperature: Some(t),
        });

        OllamaChatRequest {
            model,
            messages: request.messages.iter().map(Self::convert_message).collect(),
            options,
            stream: false,
            keep_alive: self.config.keep_alive.clone(),
        }
    }

    /// Parse an error response from Ollama.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<OllamaErrorResponse>(body) {
            let mut err = LlmError::provider("ollama", error_response.error);
            err.code = Some(status.to_string());
            return err;
        }
        LlmError::http_status(status, body.to_owned())
    }
}
