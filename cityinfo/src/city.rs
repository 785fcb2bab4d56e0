//! City facts and the validation/parsing of model replies.
//!
//! A reply goes through two steps:
//! 1. [`validate`]: the reply must carry a non-empty text content.
//! 2. [`parse_city_info`]: the text must decode as a JSON object, which then
//!    becomes a [`CityInfo`].
//!
//! By default the decoded shape is not checked further: missing or `null`
//! fields become empty strings and other non-string values are rendered as
//! text. [`ParseMode::Strict`] additionally requires every field to be present
//! as a JSON string.

use serde::de::{Error as _, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::chat::ChatResponse;
use crate::error::{ResponseError, Result};

/// Keys of a [`CityInfo`] object.
pub const CITY_INFO_FIELDS: [&str; 3] = ["city", "industry", "fun"];

/// What the model told us about a city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityInfo {
    /// City name as echoed by the model.
    #[serde(default, deserialize_with = "field_text")]
    pub city: String,
    /// Dominant industry.
    #[serde(default, deserialize_with = "field_text")]
    pub industry: String,
    /// Recommended leisure activity.
    #[serde(default, deserialize_with = "field_text")]
    pub fun: String,
}

impl CityInfo {
    /// Creates a value from its three fields.
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        industry: impl Into<String>,
        fun: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            industry: industry.into(),
            fun: fun.into(),
        }
    }
}

fn field_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::Array(items) => items
            .into_iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => value_text(other),
    })
}

// Strings lose their quotes; everything else keeps its JSON rendering.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// How strictly decoded objects are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Accept any JSON object; absent or `null` fields become empty strings,
    /// arrays are joined with `", "` and other values keep their JSON text.
    #[default]
    Lenient,
    /// Every field of [`CITY_INFO_FIELDS`] must be present as a JSON string.
    Strict,
}

/// Check that `raw` carries non-empty text content and return it.
///
/// # Errors
///
/// [`InvalidResponseStructure`](crate::ResponseErrorKind::InvalidResponseStructure)
/// when the message or its content is missing or empty. The serialized reply
/// is kept in [`ResponseError::raw`].
pub fn validate(raw: &ChatResponse) -> Result<&str> {
    match raw.text() {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ResponseError::invalid_structure(raw.to_json_string())),
    }
}

/// Decode the model's text as a [`CityInfo`].
///
/// # Errors
///
/// [`ParseFailure`](crate::ResponseErrorKind::ParseFailure) when `text` is not
/// JSON or is JSON but not an object, and in strict mode when a field is
/// missing or not a string. The decode error is the error's source and
/// `text` is kept in [`ResponseError::raw`].
pub fn parse_city_info(text: &str, mode: ParseMode) -> Result<CityInfo> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ResponseError::parse_failure(e, text))?;

    let Value::Object(object) = &value else {
        let err = serde_json::Error::invalid_type(unexpected(&value), &"a JSON object");
        return Err(ResponseError::parse_failure(err, text));
    };

    if mode == ParseMode::Strict {
        check_fields(object).map_err(|e| ResponseError::parse_failure(e, text))?;
    }

    let info: CityInfo =
        serde_json::from_value(value).map_err(|e| ResponseError::parse_failure(e, text))?;

    tracing::debug!(city = %info.city, industry = %info.industry, fun = %info.fun, "parsed city info");
    Ok(info)
}

/// [`validate`] then [`parse_city_info`] in lenient mode.
///
/// # Errors
///
/// See [`validate`] and [`parse_city_info`].
pub fn validate_and_parse(raw: &ChatResponse) -> Result<CityInfo> {
    parse_city_info(validate(raw)?, ParseMode::Lenient)
}

fn check_fields(object: &Map<String, Value>) -> std::result::Result<(), serde_json::Error> {
    for field in CITY_INFO_FIELDS {
        match object.get(field) {
            None => return Err(serde_json::Error::missing_field(field)),
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(serde_json::Error::invalid_type(
                    unexpected(other),
                    &"a string",
                ));
            }
        }
    }
    Ok(())
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Other("null"),
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(Unexpected::Other("number"), Unexpected::Float),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
