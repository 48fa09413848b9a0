//! Configuration surface (spec.md §6). `EMBEDDING_MODEL_*`/`LLM_MODEL_*`
//! connection params are not modeled here — they belong to whichever
//! concrete `EmbeddingProvider`/`ChatProvider` the caller constructs, not
//! to this crate's knowledge.

use weave_graph::GraphConfig;
use weave_sampler::SampleParams;

/// Every tunable the task factory exposes, with defaults matching the
/// table in spec.md §6 exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Floor for C4's candidate recall.
    pub recall_threshold: f32,
    /// Ceiling above which C5 verification is skipped.
    pub auto_accept_threshold: f32,
    /// Max producers retained per consumer parameter.
    pub top_k: usize,
    /// If `false`, `recall_threshold` becomes the final acceptance gate.
    pub enable_llm_verify: bool,
    /// Drop weakly connected components smaller than 2 nodes.
    pub prune_isolates: bool,
    /// Ceiling for C3/C5 concurrent LLM calls.
    pub max_workers: usize,
    /// C2 batch granularity.
    pub embedding_batch_size: usize,
    /// C7 walk length and retry tunables.
    pub sampling: SampleParams,
}

impl Default for Config {
    fn default() -> Self {
        let graph_defaults = GraphConfig::default();
        Self {
            recall_threshold: graph_defaults.recall_threshold,
            auto_accept_threshold: graph_defaults.auto_accept_threshold,
            top_k: graph_defaults.top_k,
            enable_llm_verify: graph_defaults.enable_llm_verify,
            prune_isolates: graph_defaults.prune_isolates,
            max_workers: graph_defaults.max_workers,
            embedding_batch_size: weave_embed::DEFAULT_BATCH_SIZE,
            sampling: SampleParams::default(),
        }
    }
}

impl Config {
    /// Project onto the subset `weave-graph` understands.
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            recall_threshold: self.recall_threshold,
            auto_accept_threshold: self.auto_accept_threshold,
            top_k: self.top_k,
            enable_llm_verify: self.enable_llm_verify,
            prune_isolates: self.prune_isolates,
            max_workers: self.max_workers,
        }
    }
}
