//! Post-validation of the synthesizer's raw LLM response (spec.md §4.8,
//! steps 2-4 of post-validation; parse-retry is step 1, handled by the
//! caller in [`crate::synthesize`]).

use std::collections::BTreeMap;

use weave_core::{is_flat_primitive, StateValue, TaskSkeleton};

use crate::IntentError;

pub struct ParsedIntent {
    pub scenario_summary: String,
    pub query: String,
    pub initial_state: BTreeMap<String, StateValue>,
    pub final_state: BTreeMap<String, StateValue>,
}

pub fn parse_response(raw: &serde_json::Value) -> Result<ParsedIntent, IntentError> {
    let query = raw
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| IntentError::InvalidResponse("missing query".to_string()))?
        .to_string();
    let scenario_summary = raw.get("scenario_summary").and_then(|v| v.as_str()).unwrap_or_default().to_string();

    let initial_state = extract_state_map(raw, "initial_state")?;
    let final_state = extract_state_map(raw, "final_state")?;

    Ok(ParsedIntent { scenario_summary, query, initial_state, final_state })
}

fn extract_state_map(raw: &serde_json::Value, key: &str) -> Result<BTreeMap<String, StateValue>, IntentError> {
    let obj = raw
        .get(key)
        .and_then(|v| v.as_object())
        .ok_or_else(|| IntentError::InvalidResponse(format!("missing or non-object {key}")))?;
    Ok(obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Step 2: every value in `initial_state`/`final_state` must be a flat
/// primitive (string, number, or boolean).
pub fn validate_flatness(intent: &ParsedIntent) -> Result<(), IntentError> {
    for (key, value) in intent.initial_state.iter().chain(intent.final_state.iter()) {
        if !is_flat_primitive(value) {
            return Err(IntentError::InvalidResponse(format!("state field '{key}' is not a flat primitive")));
        }
    }
    Ok(())
}

fn value_substring_text(value: &StateValue) -> Option<String> {
    match value {
        StateValue::String(s) => Some(s.clone()),
        StateValue::Number(n) => Some(n.to_string()),
        StateValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Step 3: every `initial_state` value must appear, as a substring, in
/// `query` (case-sensitive).
pub fn validate_grounding(intent: &ParsedIntent) -> Result<(), IntentError> {
    for (key, value) in &intent.initial_state {
        let text = value_substring_text(value)
            .ok_or_else(|| IntentError::InvalidResponse(format!("initial_state field '{key}' is not groundable")))?;
        if !intent.query.contains(&text) {
            return Err(IntentError::InvalidResponse(format!(
                "initial_state field '{key}' = '{text}' does not appear in query"
            )));
        }
    }
    Ok(())
}

/// Step 4: no parameter produced by a non-first edge (i.e. an
/// intermediate hand-off) may appear as an `initial_state` key.
pub fn validate_no_intermediate_leakage(intent: &ParsedIntent, skeleton: &TaskSkeleton) -> Result<(), IntentError> {
    let intermediate_params: Vec<&str> = skeleton
        .edges_sorted_by_step()
        .into_iter()
        .filter(|e| e.step > 1)
        .filter_map(|e| e.dependency.parameter.as_deref())
        .collect();

    for key in intent.initial_state.keys() {
        if intermediate_params.contains(&key.as_str()) {
            return Err(IntentError::InvalidResponse(format!(
                "initial_state leaks intermediate parameter '{key}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weave_core::{Dependency, Pattern, Role, SkeletonEdge, SkeletonNode};

    fn skeleton_with_chain() -> TaskSkeleton {
        TaskSkeleton {
            pattern: Pattern::Sequential,
            nodes: vec![
                SkeletonNode { name: "A".into(), description: "d".into(), category: "c".into(), parameters: Default::default(), role: Role::Core },
                SkeletonNode { name: "B".into(), description: "d".into(), category: "c".into(), parameters: Default::default(), role: Role::Core },
                SkeletonNode { name: "C".into(), description: "d".into(), category: "c".into(), parameters: Default::default(), role: Role::Core },
            ],
            edges: vec![
                SkeletonEdge { step: 1, from_tool: "A".into(), to_tool: "B".into(), dependency: Dependency::provides("city") },
                SkeletonEdge { step: 2, from_tool: "B".into(), to_tool: "C".into(), dependency: Dependency::provides("restaurant_id") },
            ],
            meta: None,
        }
    }

    #[test]
    fn scenario_s5_accepts_grounded_non_leaking_intent() {
        let raw = json!({
            "scenario_summary": "booking a restaurant",
            "query": "Book me an Italian place in Shanghai",
            "initial_state": {"city": "Shanghai", "cuisine": "Italian"},
            "final_state": {"booking_id": "BK-7741"},
        });
        let parsed = parse_response(&raw).unwrap();
        assert!(validate_flatness(&parsed).is_ok());
        assert!(validate_grounding(&parsed).is_ok());
        assert!(validate_no_intermediate_leakage(&parsed, &skeleton_with_chain()).is_ok());
    }

    #[test]
    fn scenario_s5_rejects_intermediate_parameter_leakage() {
        let raw = json!({
            "scenario_summary": "booking a restaurant",
            "query": "Book R-1 for me",
            "initial_state": {"restaurant_id": "R-1"},
            "final_state": {"booking_id": "BK-7741"},
        });
        let parsed = parse_response(&raw).unwrap();
        assert!(validate_no_intermediate_leakage(&parsed, &skeleton_with_chain()).is_err());
    }

    #[test]
    fn rejects_ungrounded_initial_state_value() {
        let raw = json!({
            "query": "Book me a table",
            "initial_state": {"city": "Shanghai"},
            "final_state": {},
        });
        let parsed = parse_response(&raw).unwrap();
        assert!(validate_grounding(&parsed).is_err());
    }

    #[test]
    fn rejects_non_flat_state_value() {
        let raw = json!({
            "query": "Book me a table",
            "initial_state": {"city": ["Shanghai"]},
            "final_state": {},
        });
        let parsed = parse_response(&raw).unwrap();
        assert!(validate_flatness(&parsed).is_err());
    }
}
