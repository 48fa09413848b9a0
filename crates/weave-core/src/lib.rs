//! # Weave Core
//!
//! Data model and tool registry (C1) for the weave task factory.
//!
//! ## Key Types
//!
//! - [`Tool`] / [`ParameterSchema`] — a canonicalized tool definition
//! - [`ToolRegistry`] — deduplicated, insertion-ordered collection of tools
//! - [`Edge`] / [`EdgeCandidate`] — tool dependency graph edges
//! - [`TaskSkeleton`] — the structural shape of a sampled task
//! - [`UserIntent`] — a concrete query plus initial/final state
//!
//! ## Quick Start
//!
//! ```rust
//! use weave_core::ToolRegistry;
//!
//! let corpus = r#"{"name":"get_weather","description":"Get current weather for a city","parameters":{"properties":{"city":{"type":"string"}}}}"#;
//! let registry = ToolRegistry::load_ndjson(corpus).unwrap();
//! assert_eq!(registry.len(), 1);
//! ```

pub mod edge;
pub mod intent;
pub mod registry;
pub mod skeleton;
pub mod tool;

pub use edge::{Edge, EdgeCandidate};
pub use intent::{is_flat_primitive, skeleton_id, IntentMeta, StateValue, UserIntent};
pub use registry::{RegistryError, ToolRegistry};
pub use skeleton::{
    Dependency, Pattern, Role, SkeletonEdge, SkeletonMeta, SkeletonNode, TaskSkeleton,
};
pub use tool::{ParameterDef, ParameterSchema, Tool, DEFAULT_CATEGORY};
