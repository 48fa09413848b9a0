//! The orchestration facade: wires `ToolRegistry` through the graph,
//! sampler, and intent synthesizer. The only crate in the workspace that
//! knows about every other `weave-*` crate; everything downstream
//! remains independently usable without it (spec.md §2 data flow).

use std::sync::Arc;

use tracing::warn;

use weave_core::{TaskSkeleton, ToolRegistry, UserIntent};
use weave_graph::Graph;
use weave_llm::provider::{ChatProvider, EmbeddingProvider};
use weave_sampler::{GraphSampler, SampleBatch, SampleMode};

use crate::config::Config;
use crate::error::PipelineError;

/// Holds the two provider handles and the tunables every stage shares.
/// Cheap to clone (both providers are `Arc`s).
#[derive(Clone)]
pub struct Pipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatProvider>,
    config: Config,
}

impl Pipeline {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>, config: Config) -> Self {
        Self { embedder, chat, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// C1: parse the newline-delimited JSON tool corpus.
    pub fn load_registry(&self, corpus: &str) -> Result<ToolRegistry, PipelineError> {
        Ok(ToolRegistry::load_ndjson(corpus)?)
    }

    /// C3 through C6: categorize, embed, propose, verify, and assemble.
    /// Fails only if the embedding stage (C2) produced no usable vectors
    /// at all, matching spec.md §7's "the top-level builder fails only if
    /// *no* embeddings were obtained."
    pub async fn build_graph(&self, registry: &mut ToolRegistry) -> Result<Graph, PipelineError> {
        let graph_config = self.config.graph_config();

        weave_graph::categorize_registry(registry, Arc::clone(&self.chat), &graph_config).await;

        let cache =
            weave_embed::build_embedding_cache(registry, self.embedder.as_ref(), self.config.embedding_batch_size).await;
        if cache.producer_names().is_empty() {
            return Err(PipelineError::NoEmbeddings);
        }

        Ok(weave_graph::assemble_graph(registry, &cache, Arc::clone(&self.chat), &graph_config).await)
    }

    /// C7: draw `count` skeletons from `graph` via `sampler`. Sampler
    /// state is caller-owned — independent sampling passes must use
    /// independent `GraphSampler` instances (spec.md §5).
    pub fn sample(
        &self,
        sampler: &mut GraphSampler,
        graph: &Graph,
        mode: SampleMode,
        count: usize,
        rng: &mut impl rand::Rng,
    ) -> SampleBatch {
        sampler.generate_skeletons(graph, mode, count, &self.config.sampling, rng)
    }

    /// C8: synthesize one `UserIntent` per skeleton. A skeleton whose
    /// intent fails validation after retries is omitted from the
    /// output, never surfaced as an error (spec.md §7 propagation
    /// policy: "a failed skeleton/intent is omitted from the batch").
    pub async fn synthesize_intents(
        &self,
        skeletons: &[TaskSkeleton],
        generator_version: &str,
    ) -> Vec<(TaskSkeleton, UserIntent)> {
        let mut out = Vec::with_capacity(skeletons.len());
        for skeleton in skeletons {
            match weave_intent::synthesize_intent(skeleton, self.chat.as_ref(), generator_version).await {
                Ok(intent) => out.push((skeleton.clone(), intent)),
                Err(e) => warn!(error = %e, "skipping skeleton after intent synthesis failure"),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_llm::{MockChatProvider, MockEmbeddingProvider};

    fn pipeline() -> Pipeline {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(16));
        let chat: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::constant(r#"{"valid": true}"#));
        Pipeline::new(embedder, chat, Config::default())
    }

    #[test]
    fn loads_registry_from_corpus() {
        let pipeline = pipeline();
        let registry = pipeline
            .load_registry(r#"{"name":"a","description":"d","parameters":{}}"#)
            .unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_malformed_corpus() {
        let pipeline = pipeline();
        assert!(matches!(pipeline.load_registry("{bad"), Err(PipelineError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn builds_graph_from_similar_tools() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(16));
        let chat: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::constant(r#"{"valid": true}"#));
        let config = Config { recall_threshold: 0.0, auto_accept_threshold: 2.0, prune_isolates: false, ..Config::default() };
        let pipeline = Pipeline::new(embedder, chat, config);

        let input = "{\"name\":\"get_user\",\"description\":\"Finds a user id by email\",\"parameters\":{}}\n\
                      {\"name\":\"send_email\",\"description\":\"Sends an email\",\"parameters\":{\"properties\":{\"user_id\":{\"type\":\"string\",\"description\":\"Finds a user id by email\"}}}}\n";
        let mut registry = pipeline.load_registry(input).unwrap();

        let graph = pipeline.build_graph(&mut registry).await.unwrap();
        assert_eq!(graph.node_count(), 2);
    }

    #[tokio::test]
    async fn synthesizes_intents_skipping_failures() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(16));
        let chat: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::constant("not json"));
        let pipeline = Pipeline::new(embedder, chat, Config::default());

        let skeleton = TaskSkeleton {
            pattern: weave_core::Pattern::Sequential,
            nodes: vec![
                weave_core::SkeletonNode {
                    name: "A".into(),
                    description: "d".into(),
                    category: "c".into(),
                    parameters: Default::default(),
                    role: weave_core::Role::Core,
                },
            ],
            edges: vec![],
            meta: None,
        };

        let out = pipeline.synthesize_intents(&[skeleton], "v1").await;
        assert!(out.is_empty());
    }
}
