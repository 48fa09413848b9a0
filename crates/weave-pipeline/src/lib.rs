//! # Weave Pipeline
//!
//! Orchestration facade for the tool-graph task factory: wires the
//! Tool Registry (C1) through Persistence (C9). This is the only crate
//! in the workspace with knowledge of every other `weave-*` crate —
//! each of those remains independently usable without it.
//!
//! CLI entry points, `.env` loading, and the concrete `Embed`/`Chat`
//! backends are out of scope (spec.md §1); callers supply
//! `Arc<dyn EmbeddingProvider>` / `Arc<dyn ChatProvider>` implementations.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use error::PipelineError;
pub use pipeline::Pipeline;
