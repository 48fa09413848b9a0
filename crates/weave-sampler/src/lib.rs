//! # Weave Sampler
//!
//! Graph Sampler (C7): a coverage-decayed random walk over a
//! [`weave_graph::Graph`] that produces [`weave_core::TaskSkeleton`]
//! values. Deliberately exposes only `sequential` and
//! `neighborhood_subgraph` — branching and parallel-start sampling
//! (present in the legacy `sample_dag` module this was recovered from)
//! are not implemented here.

pub mod counters;
pub mod sampler;
pub mod walk;

pub use counters::Counters;
pub use sampler::{GraphSampler, SampleBatch, SampleMode, SampleParams};
