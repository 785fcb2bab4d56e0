//! Ollama API client implementation.
//!
//! Non-streaming chat completions against a local Ollama server
//! (`POST {base_url}/api/chat`).

mod chat;
mod client;
mod config;
mod types;

pub use client::Ollama;
pub use config::OllamaConfig;
