//! The two vector tables C2 owns: per-tool producer semantics and
//! per-(tool, parameter) consumer semantics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Batched, L2-normalized embedding tables. Exclusively owned by the
/// embedding cache; all other components hold read-only references
/// (spec.md §3 Ownership).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingCache {
    /// `desc_vec[toolName] -> vector`
    pub desc_vec: HashMap<String, Vec<f32>>,
    /// `param_vec[toolName][paramName] -> vector`
    pub param_vec: HashMap<String, HashMap<String, Vec<f32>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool_vector(&self, tool: &str) -> Option<&Vec<f32>> {
        self.desc_vec.get(tool)
    }

    pub fn param_vector(&self, tool: &str, param: &str) -> Option<&Vec<f32>> {
        self.param_vec.get(tool)?.get(param)
    }

    pub fn insert_tool_vector(&mut self, tool: impl Into<String>, vector: Vec<f32>) {
        self.desc_vec.insert(tool.into(), vector);
    }

    pub fn insert_param_vector(&mut self, tool: impl Into<String>, param: impl Into<String>, vector: Vec<f32>) {
        self.param_vec.entry(tool.into()).or_default().insert(param.into(), vector);
    }

    /// Every `(tool, param)` pair with a cached consumer vector, in a
    /// stable order (sorted by tool then parameter) for reproducible
    /// matrix construction in C4.
    pub fn consumer_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .param_vec
            .iter()
            .flat_map(|(tool, params)| params.keys().map(move |p| (tool.clone(), p.clone())))
            .collect();
        pairs.sort();
        pairs
    }

    /// Every tool with a cached producer vector, in a stable (sorted) order.
    pub fn producer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.desc_vec.keys().cloned().collect();
        names.sort();
        names
    }
}
