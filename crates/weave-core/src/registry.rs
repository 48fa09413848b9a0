//! Tool Registry (C1): parses a newline-delimited JSON tool corpus into
//! canonicalized [`Tool`] records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tool::{ParameterSchema, Tool};

/// Errors the registry can raise. Per spec.md §7, only a top-level JSON
/// parse failure of the corpus itself is fatal; malformed individual
/// records are logged and skipped.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable-after-load collection of [`Tool`] records, keyed by name.
///
/// Uses an insertion-ordered map so iteration order (and therefore
/// embedding-batch ordering in C2) is deterministic across runs.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ToolRegistry {
    tools: IndexMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tool> {
        self.tools.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Insert a tool, first occurrence wins (dedup by name).
    fn insert_first_wins(&mut self, tool: Tool) {
        if tool.name.is_empty() {
            warn!("skipping tool record with empty name");
            return;
        }
        if self.tools.contains_key(&tool.name) {
            debug!(name = %tool.name, "duplicate tool name, keeping first occurrence");
            return;
        }
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Parse a newline-delimited JSON tool corpus. Each line may be:
    /// - a bare function object `{name, description, parameters}`
    /// - an OpenAI-style wrapper `{type: "function", function: {...}}`
    /// - a record whose `tools` field is an array of either of the above,
    ///   or a JSON-encoded string containing such an array
    ///
    /// Fails with [`RegistryError::MalformedRecord`] only when a line's
    /// JSON itself cannot be parsed; a line that parses but yields no
    /// usable tool definitions is logged and skipped.
    pub fn load_ndjson(input: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        let mut processed = 0usize;
        let mut skipped = 0usize;

        for (idx, raw_line) in input.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let record: Value =
                serde_json::from_str(line).map_err(|source| RegistryError::MalformedRecord {
                    line: idx + 1,
                    source,
                })?;

            for tool_value in extract_tool_values(&record) {
                match parse_tool(&tool_value) {
                    Some(tool) => registry.insert_first_wins(tool),
                    None => skipped += 1,
                }
            }
            processed += 1;
        }

        debug!(
            tools = registry.len(),
            lines = processed,
            skipped_records = skipped,
            "tool registry loaded"
        );
        Ok(registry)
    }
}

/// Pull the list of raw tool-shaped JSON values out of one corpus record.
fn extract_tool_values(record: &Value) -> Vec<Value> {
    if let Some(tools_field) = record.get("tools") {
        return match tools_field {
            Value::Array(arr) => arr.clone(),
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(arr)) => arr,
                Ok(single) => vec![single],
                Err(e) => {
                    warn!(error = %e, "tools field was a string but not valid JSON, skipping record");
                    Vec::new()
                }
            },
            other => vec![other.clone()],
        };
    }
    vec![record.clone()]
}

/// Unwrap an OpenAI-style `{type: "function", function: {...}}` envelope
/// if present, then extract `name`/`description`/`parameters`.
fn parse_tool(value: &Value) -> Option<Tool> {
    let function = value.get("function").unwrap_or(value);

    let name = function.get("name")?.as_str()?.to_string();
    let description = function
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let parameters: ParameterSchema = function
        .get("parameters")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .unwrap_or(None)
        .unwrap_or_default();

    Some(Tool::new(name, description, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_function_object() {
        let input = r#"{"name":"get_weather","description":"Get weather","parameters":{"properties":{"city":{"type":"string"}}}}"#;
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.contains("get_weather"));
    }

    #[test]
    fn accepts_openai_wrapper() {
        let input = r#"{"type":"function","function":{"name":"search","description":"Search the web","parameters":{}}}"#;
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        assert!(reg.contains("search"));
    }

    #[test]
    fn accepts_tools_array_field() {
        let input = r#"{"tools":[{"function":{"name":"a","description":"A"}},{"function":{"name":"b","description":"B"}}]}"#;
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn accepts_tools_field_as_json_string() {
        let inner = r#"[{"name":"c","description":"C"}]"#;
        let input = format!(r#"{{"tools": {}}}"#, serde_json::to_string(inner).unwrap());
        let reg = ToolRegistry::load_ndjson(&input).unwrap();
        assert!(reg.contains("c"));
    }

    #[test]
    fn dedups_by_name_first_wins() {
        let input = "{\"name\":\"x\",\"description\":\"first\"}\n{\"name\":\"x\",\"description\":\"second\"}\n";
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("x").unwrap().description, "first");
    }

    #[test]
    fn accepts_empty_parameter_schema_and_nameless_records_are_skipped() {
        let input = "{\"name\":\"noargs\",\"description\":\"d\"}\n{\"description\":\"no name here\"}\n";
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        assert_eq!(reg.len(), 1);
        assert!(reg.get("noargs").unwrap().parameters.is_empty());
    }

    #[test]
    fn top_level_malformed_json_is_fatal() {
        let input = "{not valid json";
        let err = ToolRegistry::load_ndjson(input).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn empty_description_excludes_from_intent_prompting_but_not_registry() {
        let input = "{\"name\":\"silent\",\"description\":\"\"}\n";
        let reg = ToolRegistry::load_ndjson(input).unwrap();
        let tool = reg.get("silent").unwrap();
        assert!(!tool.eligible_for_intent_prompting());
    }
}
