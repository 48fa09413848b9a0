//! Edge Verifier (C5): LLM adjudication of mid-confidence candidates
//! (`recall_threshold <= score < auto_accept_threshold`). Adjudication
//! is pure and independent per candidate — no shared state, unlike the
//! categorizer's pool (spec.md §5).

use std::sync::Arc;

use weave_core::EdgeCandidate;
use weave_llm::provider::ChatProvider;
use weave_llm::{bounded_for_each, parse_json_response, CallPolicy};

use crate::config::GraphConfig;

/// Split `candidates` into those that clear `auto_accept_threshold`
/// outright and those that need verification.
pub fn partition_by_confidence(candidates: Vec<EdgeCandidate>, config: &GraphConfig) -> (Vec<EdgeCandidate>, Vec<EdgeCandidate>) {
    candidates.into_iter().partition(|c| c.score >= config.auto_accept_threshold)
}

fn verifier_prompt(candidate: &EdgeCandidate) -> (String, String) {
    let system = "You decide whether one API tool's output plausibly supplies a parameter \
                  another API tool needs. Respond with a JSON object: {\"valid\": true|false}."
        .to_string();
    let user = format!(
        "Producer tool: {}\nConsumer tool: {}\nConsumer parameter: {}\nDoes the producer's output plausibly supply this parameter?",
        candidate.producer, candidate.consumer, candidate.parameter
    );
    (system, user)
}

/// Adjudicate mid-confidence candidates with up to `max_workers`
/// concurrent LLM calls. A candidate is kept only when the response
/// parses and contains `"valid": true`; any failure (timeout, retry
/// exhaustion, unparseable response) rejects the candidate (spec.md §7).
pub async fn verify_candidates(
    candidates: Vec<EdgeCandidate>,
    chat: Arc<dyn ChatProvider>,
    config: &GraphConfig,
) -> Vec<EdgeCandidate> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let policy = CallPolicy::default();
    let chat_for_workers = Arc::clone(&chat);

    let verdicts = bounded_for_each(candidates, config.max_workers, move |candidate| {
        let chat = Arc::clone(&chat_for_workers);
        async move {
            let accepted = adjudicate(chat.as_ref(), &candidate, policy).await;
            (candidate, accepted)
        }
    })
    .await;

    verdicts.into_iter().filter_map(|(candidate, accepted)| accepted.then_some(candidate)).collect()
}

async fn adjudicate(chat: &dyn ChatProvider, candidate: &EdgeCandidate, policy: CallPolicy) -> bool {
    let (system, user) = verifier_prompt(candidate);

    let response = match weave_llm::with_retry(policy, "verify_edge", || chat.chat(&system, &user, None)).await {
        Ok(r) => r,
        Err(_) => return false,
    };

    match parse_json_response(&response) {
        Ok(value) => value.get("valid").and_then(|v| v.as_bool()).unwrap_or(false),
        Err(_) => false,
    }
}
