//! Categorizer (C3): per-tool LLM classification into a dynamically
//! growing category pool.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::warn;
use weave_core::ToolRegistry;
use weave_llm::provider::ChatProvider;
use weave_llm::{bounded_for_each, parse_json_response, CallPolicy};

use crate::config::GraphConfig;

const SEED_CATEGORIES: &[&str] = &[
    "Sports",
    "Finance",
    "Weather",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Education",
];

/// The shared, add-only pool of category names. Benign races: a stale
/// read can only produce an occasional redundant category, never
/// incorrect data (spec.md §5).
#[derive(Debug, Clone)]
pub struct CategoryPool {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl Default for CategoryPool {
    fn default() -> Self {
        let seeded = SEED_CATEGORIES.iter().map(|s| s.to_string()).collect();
        Self { inner: Arc::new(Mutex::new(seeded)) }
    }
}

impl CategoryPool {
    pub fn snapshot(&self) -> Vec<String> {
        let mut v: Vec<String> = self.inner.lock().expect("category pool poisoned").iter().cloned().collect();
        v.sort();
        v
    }

    /// Normalize (trim + title-case) and add `candidate`, returning the
    /// normalized value actually stored.
    fn add(&self, candidate: &str) -> Option<String> {
        let normalized = title_case(candidate.trim());
        if normalized.is_empty() {
            return None;
        }
        self.inner.lock().expect("category pool poisoned").insert(normalized.clone());
        Some(normalized)
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn categorizer_prompt(pool: &[String]) -> String {
    format!(
        "You are classifying an API tool into a broad category.\n\
         Existing categories: {}\n\
         Either pick one of these, or propose a new short, broad category name if none fit.\n\
         Respond with a JSON object: {{\"category\": \"<name>\"}}",
        pool.join(", ")
    )
}

/// Categorize every tool whose `category == "general"`. On success the
/// tool's category is overwritten exactly once; on failure (timeout,
/// retry exhaustion, unparseable response) the tool is left at
/// `"general"` (spec.md §7).
pub async fn categorize_registry(registry: &mut ToolRegistry, chat: Arc<dyn ChatProvider>, config: &GraphConfig) {
    let pool = CategoryPool::default();

    let pending: Vec<(String, String)> = registry
        .iter()
        .filter(|t| t.category == weave_core::DEFAULT_CATEGORY)
        .map(|t| (t.name.clone(), t.description.clone()))
        .collect();

    if pending.is_empty() {
        return;
    }

    let policy = CallPolicy::default();
    let pool_for_workers = pool.clone();
    let chat_for_workers = Arc::clone(&chat);

    let results = bounded_for_each(pending, config.max_workers, move |(name, description)| {
        let pool = pool_for_workers.clone();
        let chat = Arc::clone(&chat_for_workers);
        async move {
            let category = classify_one(chat.as_ref(), &pool, &description, policy).await;
            (name, category)
        }
    })
    .await;

    for (name, category) in results {
        if let Some(category) = category {
            if let Some(tool) = registry.get_mut(&name) {
                tool.category = category;
            }
        }
    }
}

async fn classify_one(
    chat: &dyn ChatProvider,
    pool: &CategoryPool,
    description: &str,
    policy: CallPolicy,
) -> Option<String> {
    let snapshot = pool.snapshot();
    let prompt = categorizer_prompt(&snapshot);

    let response = weave_llm::with_retry(policy, "categorize", || {
        chat.chat(&prompt, description, None)
    })
    .await
    .ok()?;

    let value = parse_json_response(&response).ok()?;
    let category = value.get("category")?.as_str()?;
    match pool.add(category) {
        Some(normalized) => Some(normalized),
        None => {
            warn!(category, "categorizer returned an empty/blank category, leaving tool as general");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_llm::MockChatProvider;

    #[tokio::test]
    async fn assigns_category_from_llm_response() {
        let input = r#"{"name":"get_score","description":"Get the live score of a football match"}"#;
        let mut registry = ToolRegistry::load_ndjson(input).unwrap();

        let chat: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::constant(r#"{"category": "sports"}"#));
        let config = GraphConfig::default();

        categorize_registry(&mut registry, chat, &config).await;

        assert_eq!(registry.get("get_score").unwrap().category, "Sports");
    }

    #[tokio::test]
    async fn leaves_tool_general_on_unparseable_response() {
        let input = r#"{"name":"mystery","description":"does something"}"#;
        let mut registry = ToolRegistry::load_ndjson(input).unwrap();
        let chat: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::constant("not json"));
        let config = GraphConfig { max_workers: 2, ..GraphConfig::default() };

        categorize_registry(&mut registry, chat, &config).await;

        assert_eq!(registry.get("mystery").unwrap().category, weave_core::DEFAULT_CATEGORY);
    }
}
