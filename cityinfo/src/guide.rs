//! End-to-end city lookups.
//!
//! [`CityGuide`] ties the pieces together: build the prompt, send it once
//! through a [`ChatProvider`], validate and parse the reply. Every failure
//! ends the lookup; nothing is retried and nothing is cached.

use tracing::{debug, instrument, warn};

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::city::{CityInfo, ParseMode, parse_city_info, validate};
use crate::error::{LlmError, ResponseError, Result};
use crate::message::Message;
use crate::prompts::{SchemaDescriptor, build_messages};

/// Send `messages` to `provider` once and return the raw reply.
///
/// # Errors
///
/// Whatever transport error the provider reports.
pub async fn request<P>(
    provider: &P,
    model: &str,
    messages: Vec<Message>,
) -> std::result::Result<ChatResponse, LlmError>
where
    P: ChatProvider + ?Sized,
{
    send(provider, &ChatRequest::with_messages(model, messages)).await
}

async fn send<P>(
    provider: &P,
    request: &ChatRequest,
) -> std::result::Result<ChatResponse, LlmError>
where
    P: ChatProvider + ?Sized,
{
    let response = provider.chat(request).await?;

    debug!(
        provider = provider.provider_name(),
        raw = %response.to_json_string(),
        "received inference response"
    );
    Ok(response)
}

/// Looks up cities through a [`ChatProvider`].
///
/// Holds no mutable state; share it freely between tasks.
///
/// # Example
///
/// ```rust,ignore
/// use cityinfo::prelude::*;
///
/// let guide = CityGuide::new(Ollama::from_env()?);
/// let info = guide.lookup("London").await?;
/// println!("{} runs on {}; try: {}", info.city, info.industry, info.fun);
/// ```
#[derive(Debug, Clone)]
pub struct CityGuide<P> {
    provider: P,
    model: String,
    schema: SchemaDescriptor,
    mode: ParseMode,
    temperature: Option<f32>,
}

impl<P: ChatProvider> CityGuide<P> {
    /// Create a guide using the provider's default model, the built-in
    /// schema and lenient parsing.
    #[must_use]
    pub fn new(provider: P) -> Self {
        let model = provider.default_model().to_owned();
        Self {
            provider,
            model,
            schema: SchemaDescriptor::city_info(),
            mode: ParseMode::default(),
            temperature: None,
        }
    }

    /// Use a different model id.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different schema description in the prompt.
    #[must_use]
    pub fn schema(mut self, schema: SchemaDescriptor) -> Self {
        self.schema = schema;
        self
    }

    /// Set how strictly replies are checked after decoding.
    #[must_use]
    pub const fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sampling temperature sent with each request. Unset means the
    /// server's default.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Model id sent with each request.
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Ask the model about `city`.
    ///
    /// `city` is not validated; an empty string is sent as-is.
    ///
    /// # Errors
    ///
    /// - `RequestFailure` if the provider call fails; the error carries `city`.
    /// - `InvalidResponseStructure` if the reply has no text content.
    /// - `ParseFailure` if the text is not an acceptable JSON object.
    #[instrument(skip(self), fields(model = %self.model, provider = self.provider.provider_name()))]
    pub async fn lookup(&self, city: &str) -> Result<CityInfo> {
        let messages = build_messages(city, &self.schema);
        let mut chat = ChatRequest::with_messages(&self.model, messages);
        chat.temperature = self.temperature;

        let raw = send(&self.provider, &chat)
            .await
            .map_err(|e| ResponseError::request_failure(city, e))
            .inspect_err(|e| warn!(kind = e.name(), "{e}"))?;

        validate(&raw)
            .and_then(|text| parse_city_info(text, self.mode))
            .map_err(|e| e.with_city(city))
            .inspect_err(|e| warn!(kind = e.name(), raw = e.raw.as_deref(), "{e}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ResponseErrorKind;
    use crate::llms::MockProvider;
    use crate::message::Role;

    const LONDON: &str =
        r#"{"city":"London","industry":"Finance","fun":"Visit the British Museum"}"#;

    #[tokio::test]
    async fn request_sends_model_and_messages() {
        let provider = MockProvider::with_text("{}");
        let messages = vec![Message::system("rules"), Message::user("Berlin")];

        let raw = request(&provider, "llama3.2", messages.clone()).await.unwrap();

        assert_eq!(raw.text(), Some("{}"));
        let sent = provider.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "llama3.2");
        assert_eq!(sent[0].messages, messages);
    }

    #[tokio::test]
    async fn request_works_through_trait_object() {
        let provider: Arc<dyn ChatProvider> = Arc::new(MockProvider::with_text("ok"));
        let raw = request(provider.as_ref(), "m", Vec::new()).await.unwrap();
        assert_eq!(raw.text(), Some("ok"));
    }

    #[tokio::test]
    async fn lookup_returns_parsed_info() {
        let guide = CityGuide::new(MockProvider::with_text(LONDON));

        let info = guide.lookup("London").await.unwrap();

        assert_eq!(
            info,
            CityInfo::new("London", "Finance", "Visit the British Museum")
        );
    }

    #[tokio::test]
    async fn lookup_sends_system_then_city() {
        let guide = CityGuide::new(MockProvider::with_text(LONDON).with_model("phi3"));

        guide.lookup("London").await.unwrap();

        let sent = guide.provider().requests();
        assert_eq!(sent[0].model, "phi3");
        assert_eq!(sent[0].messages.len(), 2);
        assert_eq!(sent[0].messages[0].role, Role::System);
        assert_eq!(sent[0].messages[1], Message::user("London"));
    }

    #[tokio::test]
    async fn model_override_is_sent() {
        let guide = CityGuide::new(MockProvider::with_text(LONDON)).model("gemma2");
        guide.lookup("London").await.unwrap();

        assert_eq!(guide.model_id(), "gemma2");
        assert_eq!(guide.provider().requests()[0].model, "gemma2");
    }

    #[tokio::test]
    async fn temperature_is_sent_only_when_set() {
        let guide = CityGuide::new(MockProvider::with_text(LONDON));
        guide.lookup("London").await.unwrap();
        assert!(guide.provider().requests()[0].temperature.is_none());

        let guide = CityGuide::new(MockProvider::with_text(LONDON)).temperature(0.1);
        guide.lookup("London").await.unwrap();
        assert_eq!(guide.provider().requests()[0].temperature, Some(0.1));
    }

    #[tokio::test]
    async fn transport_failure_is_request_failure_with_city() {
        let guide = CityGuide::new(MockProvider::failing(LlmError::network(
            "Connection failed: connection refused",
        )));

        let err = guide.lookup("Nairobi").await.unwrap_err();

        assert_eq!(err.kind, ResponseErrorKind::RequestFailure);
        assert_eq!(err.city.as_deref(), Some("Nairobi"));
        assert!(err.llm_error().unwrap().message.contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_reply_is_invalid_structure_with_city() {
        let guide = CityGuide::new(MockProvider::new(vec![Ok(ChatResponse::empty())]));

        let err = guide.lookup("Quito").await.unwrap_err();

        assert_eq!(err.kind, ResponseErrorKind::InvalidResponseStructure);
        assert_eq!(err.city.as_deref(), Some("Quito"));
    }

    #[tokio::test]
    async fn strict_mode_rejects_partial_object() {
        let guide = CityGuide::new(MockProvider::with_text(r#"{"city":"Quito"}"#))
            .parse_mode(ParseMode::Strict);

        let err = guide.lookup("Quito").await.unwrap_err();

        assert_eq!(err.kind, ResponseErrorKind::ParseFailure);
        assert_eq!(err.raw.as_deref(), Some(r#"{"city":"Quito"}"#));
    }

    #[tokio::test]
    async fn lenient_mode_accepts_partial_object() {
        let guide = CityGuide::new(MockProvider::with_text(r#"{"city":"Quito"}"#));
        let info = guide.lookup("Quito").await.unwrap();
        assert_eq!(info, CityInfo::new("Quito", "", ""));
    }

    #[tokio::test]
    async fn custom_schema_reaches_prompt() {
        let schema = SchemaDescriptor::city_info().field(
            "fun",
            crate::prompts::FieldSpec::string("Something free to do outdoors"),
        );
        let guide = CityGuide::new(MockProvider::with_text(LONDON)).schema(schema);

        guide.lookup("London").await.unwrap();

        let system = &guide.provider().requests()[0].messages[0].content;
        assert!(system.contains("Something free to do outdoors"));
    }
}
