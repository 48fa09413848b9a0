//! Prompt construction for one skeleton's core chain: a compact tool
//! array plus a human-readable step-by-step description.

use serde_json::json;

use weave_core::{SkeletonNode, TaskSkeleton};

const SYSTEM_PROMPT: &str = "You write a realistic user request for a multi-step API task. \
Given the ordered tools below and how their outputs feed each other, respond with a single \
JSON object: {\"scenario_summary\": string, \"query\": string, \"initial_state\": {flat key/value}, \
\"final_state\": {flat key/value}}. initial_state and final_state values must be strings, numbers, \
or booleans only — never arrays or objects. Every value in initial_state must be literally quoted, \
verbatim, inside query.";

fn tool_array_json(core: &[&SkeletonNode]) -> serde_json::Value {
    json!(core
        .iter()
        .map(|node| json!({
            "name": node.name,
            "description": node.description,
            "parameters": node.parameters,
        }))
        .collect::<Vec<_>>())
}

fn chain_description(skeleton: &TaskSkeleton) -> String {
    skeleton
        .edges_sorted_by_step()
        .iter()
        .map(|edge| {
            let parameter = edge.dependency.parameter.as_deref().unwrap_or("?");
            format!("Step {}: {} \u{2192} {} (Passes output to parameter: '{}')", edge.step, edge.from_tool, edge.to_tool, parameter)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the `(system, user)` prompt pair for `skeleton`'s ordered core chain.
pub fn build_prompt(skeleton: &TaskSkeleton) -> (String, String) {
    let core: Vec<&SkeletonNode> = skeleton.core_nodes().collect();
    let tools = tool_array_json(&core);
    let chain = chain_description(skeleton);

    let user = format!(
        "Tools (in no particular order):\n{}\n\nChain of calls:\n{}",
        serde_json::to_string(&tools).unwrap_or_else(|_| "[]".to_string()),
        chain
    );

    (SYSTEM_PROMPT.to_string(), user)
}
