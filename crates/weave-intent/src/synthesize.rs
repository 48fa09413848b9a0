//! Intent Synthesizer (C8): prompt a `Chat` provider for one skeleton's
//! core chain, validate the response, and wrap it as a [`UserIntent`].

use thiserror::Error;
use tracing::warn;

use weave_core::{skeleton_id, IntentMeta, TaskSkeleton, UserIntent};
use weave_llm::provider::ChatProvider;
use weave_llm::parse_json_response;

use crate::prompt::build_prompt;
use crate::validate::{parse_response, validate_flatness, validate_grounding, validate_no_intermediate_leakage};

/// Matches the `ModelOutputInvalid` error taxonomy entry for this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntentError {
    #[error("chat call failed: {0}")]
    ProviderFailed(String),
    #[error("invalid model output: {0}")]
    InvalidResponse(String),
}

/// Re-prompt budget on parse/validation failure (spec.md §4.8: "retries
/// up to 3 on parse failure").
pub const MAX_PARSE_RETRIES: u32 = 3;

/// Synthesize one [`UserIntent`] for `skeleton`'s ordered core chain.
/// Retries the whole round-trip (prompt -> parse -> validate) up to
/// [`MAX_PARSE_RETRIES`] times; the first attempt that parses and passes
/// every validation step wins.
pub async fn synthesize_intent(
    skeleton: &TaskSkeleton,
    chat: &dyn ChatProvider,
    generator_version: &str,
) -> Result<UserIntent, IntentError> {
    let (system, user) = build_prompt(skeleton);
    // Includes distractor nodes, not just the core chain: the reported
    // tool surface must match what was actually sampled into the
    // skeleton, or a neighborhood_subgraph's distractors test nothing.
    let available_tools: Vec<String> = skeleton.all_node_names();

    let mut last_err = IntentError::InvalidResponse("no attempts made".to_string());

    for attempt in 0..MAX_PARSE_RETRIES {
        let response = chat
            .chat(&system, &user, None)
            .await
            .map_err(|e| IntentError::ProviderFailed(e.to_string()))?;

        match try_build_intent(&response, skeleton, &available_tools, generator_version) {
            Ok(intent) => return Ok(intent),
            Err(e) => {
                warn!(attempt, error = %e, "intent synthesis attempt failed validation");
                last_err = e;
            }
        }
    }

    Err(last_err)
}

fn try_build_intent(
    response: &str,
    skeleton: &TaskSkeleton,
    available_tools: &[String],
    generator_version: &str,
) -> Result<UserIntent, IntentError> {
    let raw = parse_json_response(response).map_err(|e| IntentError::InvalidResponse(e.to_string()))?;
    let parsed = parse_response(&raw)?;

    validate_flatness(&parsed)?;
    validate_grounding(&parsed)?;
    validate_no_intermediate_leakage(&parsed, skeleton)?;

    Ok(UserIntent {
        query: parsed.query,
        initial_state: parsed.initial_state,
        final_state: parsed.final_state,
        available_tools: available_tools.to_vec(),
        meta: IntentMeta {
            skeleton_id: skeleton_id(skeleton),
            scenario: parsed.scenario_summary,
            pattern: skeleton.pattern,
            generator_version: generator_version.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::{Dependency, Pattern, Role, SkeletonEdge, SkeletonNode};
    use weave_llm::MockChatProvider;

    fn skeleton() -> TaskSkeleton {
        TaskSkeleton {
            pattern: Pattern::Sequential,
            nodes: vec![
                SkeletonNode { name: "A".into(), description: "Finds a city".into(), category: "c".into(), parameters: Default::default(), role: Role::Core },
                SkeletonNode { name: "B".into(), description: "Books a table".into(), category: "c".into(), parameters: Default::default(), role: Role::Core },
            ],
            edges: vec![SkeletonEdge { step: 1, from_tool: "A".into(), to_tool: "B".into(), dependency: Dependency::provides("city") }],
            meta: None,
        }
    }

    #[tokio::test]
    async fn synthesizes_intent_on_first_valid_response() {
        let response = r#"{"scenario_summary": "booking", "query": "Book a table in Shanghai", "initial_state": {"city": "Shanghai"}, "final_state": {"booking_id": "BK-1"}}"#;
        let chat = MockChatProvider::constant(response);

        let intent = synthesize_intent(&skeleton(), &chat, "v1").await.unwrap();

        assert_eq!(intent.query, "Book a table in Shanghai");
        assert_eq!(intent.meta.pattern, Pattern::Sequential);
        assert!(intent.meta.skeleton_id.starts_with("skel_"));
    }

    #[tokio::test]
    async fn retries_up_to_budget_then_fails() {
        let chat = MockChatProvider::constant("not json at all");
        let err = synthesize_intent(&skeleton(), &chat, "v1").await.unwrap_err();
        assert!(matches!(err, IntentError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn succeeds_after_one_bad_attempt() {
        let good = r#"{"scenario_summary": "booking", "query": "Book a table in Shanghai", "initial_state": {"city": "Shanghai"}, "final_state": {}}"#;
        let chat = MockChatProvider::cycling(vec!["garbage".to_string(), good.to_string()]);

        let intent = synthesize_intent(&skeleton(), &chat, "v1").await.unwrap();
        assert_eq!(intent.query, "Book a table in Shanghai");
    }
}
