//! Tool definitions: name, description, and JSON-schema-shaped parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The default category assigned to every tool until the categorizer (C3)
/// overwrites it exactly once.
pub const DEFAULT_CATEGORY: &str = "general";

/// A single parameter in a tool's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    #[serde(rename = "type", default)]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<serde_json::Value>,
}

/// A tool's parameter object schema: an ordered mapping from parameter name
/// to its definition, plus the list of required names.
///
/// `IndexMap` preserves insertion order, matching the source JSON object's
/// key order (the original Python dict does the same) rather than
/// re-sorting parameters alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(default)]
    pub properties: IndexMap<String, ParameterDef>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSchema {
    /// Parameter schemas missing a `properties` object are still accepted
    /// by the registry — they just carry no edges as a consumer.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A canonicalized tool record.
///
/// `name` is the registry key and is immutable after load. `category`
/// starts at [`DEFAULT_CATEGORY`] and is overwritten exactly once by the
/// categorizer (C3); all other fields are immutable for the tool's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: ParameterSchema,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: ParameterSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// A tool is eligible for intent prompting (C8) only if it has a
    /// non-empty description. An empty parameter schema does *not*
    /// disqualify a tool — only missing/empty description does.
    pub fn eligible_for_intent_prompting(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Text embedded as the tool's producer-semantics vector: `"{name}: {description}"`.
    pub fn description_embedding_text(&self) -> String {
        format!("{}: {}", self.name, self.description)
    }

    /// Text embedded as a consumer-parameter's vector:
    /// `"Parameter {paramName}: {description}"`. `description` is empty
    /// when the schema omits one.
    pub fn parameter_embedding_text(&self, param_name: &str) -> Option<String> {
        self.parameters
            .properties
            .get(param_name)
            .map(|def| format!("Parameter {}: {}", param_name, def.description))
    }
}
