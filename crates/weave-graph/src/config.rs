//! Configuration surface for graph construction (spec.md §6).

/// Tunables for C4 (edge proposal), C5 (verification), and C6 (assembly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphConfig {
    /// Floor for C4's candidate recall (default `0.68`).
    pub recall_threshold: f32,
    /// Ceiling above which C5 verification is skipped (default `0.88`).
    pub auto_accept_threshold: f32,
    /// Max producers retained per consumer parameter (default `5`).
    pub top_k: usize,
    /// If `false`, `recall_threshold` becomes the final gate and no
    /// verifier calls are made.
    pub enable_llm_verify: bool,
    /// If `true`, weakly connected components smaller than 2 nodes are
    /// dropped after assembly.
    pub prune_isolates: bool,
    /// Ceiling for C3/C5 concurrent LLM calls (default `50`).
    pub max_workers: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            recall_threshold: 0.68,
            auto_accept_threshold: 0.88,
            top_k: 5,
            enable_llm_verify: true,
            prune_isolates: true,
            max_workers: 50,
        }
    }
}

/// The minimum weakly-connected-component size survivors must have
/// (spec.md §9: "fixes 2 as the default").
pub const MIN_COMPONENT_SIZE: usize = 2;
