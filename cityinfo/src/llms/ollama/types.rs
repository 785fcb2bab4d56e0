//! Ollama API request and response types.

use serde::{Deserialize, Serialize};

/// Ollama chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

/// Ollama generation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Ollama message format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    pub content: String,
}

/// Ollama chat completion response.
///
/// Every field is optional so a partial reply still decodes and reaches
/// validation instead of failing as a transport error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<OllamaResponseMessage>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Ollama response message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Ollama error response.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = OllamaChatRequest {
            model: "llama3.2".to_owned(),
            messages: vec![OllamaMessage {
                role: "user".to_owned(),
                content: "London".to_owned(),
            }],
            options: None,
            stream: false,
            keep_alive: None,
        };

        let json = serde_json::to_value(&req).expect("serialization should succeed");
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["content"], "London");
        assert!(json.get("options").is_none());
        assert!(json.get("keep_alive").is_none());
        assert!(json.get("format").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "model": "llama3.2",
            "created_at": "2024-01-01T00:00:00Z",
            "message": {
                "role": "assistant",
                "content": "{\"city\":\"London\"}"
            },
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 10,
            "eval_count": 5
        }"#;

        let response: OllamaChatResponse =
            serde_json::from_str(json).expect("deserialization should succeed");
        assert_eq!(response.model.as_deref(), Some("llama3.2"));
        let message = response.message.expect("message present");
        assert_eq!(message.content.as_deref(), Some("{\"city\":\"London\"}"));
        assert_eq!(response.eval_count, Some(5));
    }

    #[test]
    fn test_response_without_message() {
        let response: OllamaChatResponse =
            serde_json::from_str(r#"{"model":"llama3.2","done":true}"#)
                .expect("deserialization should succeed");
        assert!(response.message.is_none());
    }
}
