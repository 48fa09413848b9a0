//! Defensive parsing of `Chat` output: strip markdown code fences and
//! locate the outermost JSON object, even when a schema was requested.

use serde_json::Value;

/// Strip ```json ... ``` / ``` ... ``` fences if present, then return the
/// substring spanning the outermost `{...}` pair. Returns `None` if no
/// balanced brace pair is found.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let stripped = strip_code_fences(raw);
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&stripped[start..=end])
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Parse `Chat` output into a [`Value`], tolerating markdown fences and
/// leading/trailing prose around the JSON object.
pub fn parse_json_response(raw: &str) -> Result<Value, serde_json::Error> {
    match extract_json_object(raw) {
        Some(candidate) => serde_json::from_str(candidate),
        None => serde_json::from_str(raw),
    }
}
