//! `Embed`/`Chat` provider traits. These are the only two capabilities the
//! core depends on (spec.md §1); the concrete LLM and embedding backends
//! are deliberately out of scope and live downstream of this trait
//! boundary.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// Errors surfaced by either provider trait.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Batched text embedding. Implementations are not required to
/// L2-normalize their output — the caller (`weave-embed`) normalizes at
/// the cache boundary (spec.md §9).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Embed a batch of texts, returning one vector per input text in the
    /// same order. All vectors share a deterministic dimension `D`.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// A chat/completion call. When `json_schema` is provided, the caller
/// nonetheless parses the response defensively (see
/// [`crate::parse::extract_json_object`]) rather than trusting strict
/// schema compliance.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn chat(
        &self,
        system: &str,
        user: &str,
        json_schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError>;
}
