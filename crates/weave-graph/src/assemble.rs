//! Graph Assembler (C6): wires the registry's nodes and the union of
//! auto-accepted and verified edges into a [`Graph`], then prunes
//! undersized weakly connected components.

use std::sync::Arc;

use weave_core::{Edge, ToolRegistry};
use weave_embed::EmbeddingCache;
use weave_llm::provider::{ChatProvider, EmbeddingProvider};

use crate::config::{GraphConfig, MIN_COMPONENT_SIZE};
use crate::graph::{Graph, NodeAttrs};
use crate::propose::propose_edges;
use crate::verify::{partition_by_confidence, verify_candidates};

/// Build the full tool dependency graph: every registry tool becomes a
/// node, every candidate from C4 is partitioned by confidence, the
/// mid-confidence band goes through C5 (unless disabled), and the
/// union of auto-accepted and verified edges is assembled. Isolated or
/// undersized components are pruned last, when `prune_isolates` is set
/// (spec.md §4.6).
pub async fn assemble_graph(
    registry: &ToolRegistry,
    cache: &EmbeddingCache,
    chat: Arc<dyn ChatProvider>,
    config: &GraphConfig,
) -> Graph {
    let mut graph = Graph::new();
    for tool in registry.iter() {
        graph.add_node(
            tool.name.clone(),
            NodeAttrs {
                description: tool.description.clone(),
                category: tool.category.clone(),
                parameters: tool.parameters.clone(),
            },
        );
    }

    let candidates = propose_edges(cache, config);
    let (auto_accepted, pending) = partition_by_confidence(candidates, config);

    let verified = if config.enable_llm_verify {
        verify_candidates(pending, chat, config).await
    } else {
        // Verification disabled: recall_threshold is the final gate, so
        // mid-confidence candidates are admitted rather than discarded.
        pending
    };

    for candidate in auto_accepted.into_iter().chain(verified) {
        graph.add_edge(Edge::from(candidate));
    }

    if config.prune_isolates {
        graph.prune_small_components(MIN_COMPONENT_SIZE);
    }

    graph
}

/// Convenience entry point covering C2 through C6: categorize, embed,
/// propose, verify, assemble. Exposed here (rather than only in the
/// pipeline facade) so the graph crate is independently usable against
/// a registry someone already built.
pub async fn build_graph(
    registry: &mut ToolRegistry,
    embedder: &dyn EmbeddingProvider,
    chat: Arc<dyn ChatProvider>,
    config: &GraphConfig,
    embedding_batch_size: usize,
) -> Graph {
    crate::categorize::categorize_registry(registry, Arc::clone(&chat), config).await;
    let cache = weave_embed::build_embedding_cache(registry, embedder, embedding_batch_size).await;
    assemble_graph(registry, &cache, chat, config).await
}
