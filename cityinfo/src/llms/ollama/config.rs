//! Ollama client configuration.

/// Configuration for the Ollama client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Default model to use.
    pub model: String,
    /// Request timeout in seconds. `None` leaves the transport default.
    pub timeout_secs: Option<u64>,
    /// Controls how long the model stays loaded in memory (e.g., "5m", "0" to unload immediately).
    pub keep_alive: Option<String>,
}

impl OllamaConfig {
    /// Default Ollama API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:11434";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "llama3.2";

    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration with a specific model.
    #[must_use]
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `OLLAMA_BASE_URL` - Optional base URL
    /// - `OLLAMA_MODEL` - Optional default model
    /// - `OLLAMA_KEEP_ALIVE` - Optional keep alive duration
    /// - `OLLAMA_TIMEOUT_SECS` - Optional request timeout; unparsable values are ignored
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("OLLAMA_BASE_URL").unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());
        let model = lookup("OLLAMA_MODEL").unwrap_or_else(|| Self::DEFAULT_MODEL.to_owned());
        let keep_alive = lookup("OLLAMA_KEEP_ALIVE");
        let timeout_secs = lookup("OLLAMA_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok());

        Self {
            base_url,
            model,
            timeout_secs,
            keep_alive,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Sets the keep alive duration.
    #[must_use]
    pub fn keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: None,
            keep_alive: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_points_at_local_server() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:11434");
        assert_eq!(config.model, OllamaConfig::DEFAULT_MODEL);
        assert!(config.timeout_secs.is_none());
        assert!(config.keep_alive.is_none());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = OllamaConfig::with_model("qwen3")
            .base_url("http://gpu-box:11434")
            .timeout(30)
            .keep_alive("5m");

        assert_eq!(config.model, "qwen3");
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.keep_alive.as_deref(), Some("5m"));
    }

    #[test]
    fn lookup_without_vars_matches_default() {
        let config = OllamaConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, OllamaConfig::default());
    }

    #[test]
    fn lookup_reads_every_variable() {
        let config = OllamaConfig::from_lookup(lookup_from(&[
            ("OLLAMA_BASE_URL", "http://10.0.0.2:11434"),
            ("OLLAMA_MODEL", "mistral"),
            ("OLLAMA_KEEP_ALIVE", "0"),
            ("OLLAMA_TIMEOUT_SECS", " 45 "),
        ]));

        assert_eq!(config.base_url, "http://10.0.0.2:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.keep_alive.as_deref(), Some("0"));
        assert_eq!(config.timeout_secs, Some(45));
    }

    #[test]
    fn lookup_ignores_bad_timeout() {
        let config = OllamaConfig::from_lookup(lookup_from(&[("OLLAMA_TIMEOUT_SECS", "soon")]));
        assert!(config.timeout_secs.is_none());
    }
}
