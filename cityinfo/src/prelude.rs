//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cityinfo::prelude::*;
//! ```

pub use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ResponseMessage, Usage};
pub use crate::city::{CityInfo, ParseMode, parse_city_info, validate, validate_and_parse};
pub use crate::error::{LlmError, LlmErrorKind, ResponseError, ResponseErrorKind, Result};
pub use crate::guide::{CityGuide, request};
pub use crate::llms::{MockProvider, Ollama, OllamaConfig};
pub use crate::message::{Message, Role};
pub use crate::prompts::{FieldSpec, SchemaDescriptor, build_messages};
