//! Prompt construction.
//!
//! The model is steered towards JSON purely through instructions: the
//! [`SchemaDescriptor`] is serialized into the system message and the model
//! is asked to answer with nothing but a matching object. Nothing here
//! constrains decoding; compliance is best effort.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::message::Message;

/// Placeholder replaced by the serialized schema.
const SCHEMA_PLACEHOLDER: &str = "{schema}";

/// Instruction template for the system message.
const SYSTEM_TEMPLATE: &str = "You are a knowledgeable travel guide. \
The user will send you the name of a city. \
Answer with a single JSON object whose fields follow this schema:\n\n\
{schema}\n\n\
Every field is a string. \
Respond with JSON only: no prose before or after it, no explanations, \
no markdown code fences.";

/// Description of one expected output field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldSpec {
    /// JSON type name, e.g. `"string"`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// What the model should put in the field.
    pub description: String,
}

impl FieldSpec {
    /// A string-typed field.
    #[must_use]
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            field_type: "string".to_owned(),
            description: description.into(),
        }
    }
}

/// Ordered mapping from field name to [`FieldSpec`].
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescriptor {
    fields: Vec<(String, FieldSpec)>,
}

impl SchemaDescriptor {
    /// Creates an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any existing field with the same name in place.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = spec;
        } else {
            self.fields.push((name, spec));
        }
        self
    }

    /// The `city` / `industry` / `fun` descriptor used for city lookups.
    #[must_use]
    pub fn city_info() -> Self {
        Self::new()
            .field("city", FieldSpec::string("The name of the city"))
            .field(
                "industry",
                FieldSpec::string("The dominant industry of the city"),
            )
            .field(
                "fun",
                FieldSpec::string("A fun activity a visitor should try in the city"),
            )
    }

    /// Field names, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find_map(|(n, spec)| (n == name).then_some(spec))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the descriptor has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Pretty-printed JSON, as embedded in the system message.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Serialize for SchemaDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, spec) in &self.fields {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

/// Render the system instruction for `schema`.
#[must_use]
pub fn system_prompt(schema: &SchemaDescriptor) -> String {
    SYSTEM_TEMPLATE.replace(SCHEMA_PLACEHOLDER, &schema.to_json())
}

/// Build the two messages sent for one lookup: system instruction, then the
/// city as the user message.
///
/// `city` is passed through untouched, empty or not.
#[must_use]
pub fn build_messages(city: &str, schema: &SchemaDescriptor) -> Vec<Message> {
    vec![Message::system(system_prompt(schema)), Message::user(city)]
}
