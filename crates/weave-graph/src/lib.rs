//! # Weave Graph
//!
//! Tool dependency graph construction: categorization (C3), edge
//! proposal (C4), LLM verification (C5), and assembly (C6) into the
//! hand-rolled [`Graph`] that C7 samples from.

pub mod assemble;
pub mod categorize;
pub mod config;
pub mod graph;
pub mod propose;
pub mod verify;

pub use assemble::{assemble_graph, build_graph};
pub use categorize::{categorize_registry, CategoryPool};
pub use config::{GraphConfig, MIN_COMPONENT_SIZE};
pub use graph::{Graph, NodeAttrs};
pub use propose::propose_edges;
pub use verify::{partition_by_confidence, verify_candidates};
