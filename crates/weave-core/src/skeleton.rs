//! Task skeletons (C7 output, C8 input): the structural shape of a task,
//! before a concrete user intent is attached.

use serde::{Deserialize, Serialize};

use crate::tool::ParameterSchema;

/// Sampling pattern a skeleton was produced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Sequential,
    Chain,
    NeighborhoodSubgraph,
}

/// Whether a node participates in the executable core chain or is a
/// semantically-adjacent distractor included to test selection discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Core,
    Distractor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonNode {
    pub name: String,
    pub description: String,
    pub category: String,
    /// Carried over from the graph's node attributes so C8 never needs
    /// to reopen the registry to format its tool-array prompt section.
    #[serde(default)]
    pub parameters: ParameterSchema,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    pub relation: String,
}

impl Dependency {
    pub fn provides(parameter: impl Into<String>) -> Self {
        Self {
            parameter: Some(parameter.into()),
            relation: "provides_input_for".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonEdge {
    pub step: u32,
    #[serde(rename = "from")]
    pub from_tool: String,
    #[serde(rename = "to")]
    pub to_tool: String,
    pub dependency: Dependency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonMeta {
    pub core_chain_nodes: Vec<String>,
    #[serde(default)]
    pub distractor_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSkeleton {
    pub pattern: Pattern,
    pub nodes: Vec<SkeletonNode>,
    pub edges: Vec<SkeletonEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SkeletonMeta>,
}

impl TaskSkeleton {
    pub fn core_nodes(&self) -> impl Iterator<Item = &SkeletonNode> {
        self.nodes.iter().filter(|n| n.role == Role::Core)
    }

    pub fn all_node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// The canonical edge signature: edges sorted lexicographically as
    /// `"from->to"` strings, joined with `|`. Two skeletons with an equal
    /// signature are duplicates regardless of traversal order.
    pub fn canonical_signature(&self) -> String {
        let mut sigs: Vec<String> = self
            .edges
            .iter()
            .map(|e| format!("{}->{}", e.from_tool, e.to_tool))
            .collect();
        sigs.sort();
        sigs.join("|")
    }

    /// `md5("skel_" prefix applied by the caller)` — see
    /// [`crate::intent::skeleton_id`].
    pub fn edges_sorted_by_step(&self) -> Vec<&SkeletonEdge> {
        let mut edges: Vec<&SkeletonEdge> = self.edges.iter().collect();
        edges.sort_by_key(|e| e.step);
        edges
    }
}
