//! Inference backends.
//!
//! # Available Backends
//!
//! - [`ollama`] - Ollama local LLM server
//! - [`mock`] - Canned replies for tests and offline runs

pub mod mock;
pub mod ollama;

pub use mock::MockProvider;
pub use ollama::{Ollama, OllamaConfig};
