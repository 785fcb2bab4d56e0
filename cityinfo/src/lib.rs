//! cityinfo - structured city facts from a locally hosted language model.
//!
//! Sends a city name to an Ollama-compatible inference server, asks the model
//! (through a system prompt carrying a schema description) for a JSON object
//! describing the city's dominant industry and a leisure activity, and parses
//! the reply into a [`CityInfo`].
//!
//! ```rust,ignore
//! use cityinfo::prelude::*;
//!
//! let guide = CityGuide::new(Ollama::with_defaults()?);
//! match guide.lookup("London").await {
//!     Ok(info) => println!("{}: {} / {}", info.city, info.industry, info.fun),
//!     Err(e) => eprintln!("{} ({})", e, e.name()),
//! }
//! ```

pub mod chat;
pub mod city;
pub mod error;
pub mod guide;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod prompts;

pub use city::{CityInfo, ParseMode, parse_city_info, validate, validate_and_parse};
pub use error::{LlmError, LlmErrorKind, ResponseError, ResponseErrorKind, Result};
pub use guide::{CityGuide, request};
pub use prompts::{FieldSpec, SchemaDescriptor, build_messages};
