//! # Weave Embed
//!
//! Embedding Cache (C2): batched computation and in-memory representation
//! of the two vector tables the graph construction pipeline needs —
//! per-tool producer vectors and per-(tool, parameter) consumer vectors,
//! both L2-normalized at this boundary.

pub mod build;
pub mod cache;
pub mod normalize;

pub use build::{build_embedding_cache, DEFAULT_BATCH_SIZE};
pub use cache::EmbeddingCache;
pub use normalize::{is_zero_vector, l2_normalize};
