//! Mock `Embed`/`Chat` providers for testing, without any real backend.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::provider::{ChatProvider, EmbeddingProvider, ProviderError};

/// Deterministic mock embedding provider. Produces vectors by hashing
/// each input text into a fixed-dimension float vector, so identical
/// texts always embed identically and distinct texts are unlikely to
/// collide — good enough for exercising the similarity pipeline in
/// tests without a real backend.
#[derive(Debug)]
pub struct MockEmbeddingProvider {
    dim: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dim];
        for (i, byte) in text.bytes().enumerate() {
            let slot = i % self.dim;
            vec[slot] += (byte as f32 + 1.0) * ((i as f32 % 7.0) + 1.0);
        }
        vec
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &str {
        "mock-embedding"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// A mock chat provider that cycles through canned responses, or
/// computes one via a caller-supplied closure. Mirrors the teacher's
/// `MockProvider` (canned + "smart" response modes).
pub struct MockChatProvider {
    name: String,
    responses: Vec<String>,
    index: AtomicUsize,
    responder: Option<Mutex<Box<dyn FnMut(&str, &str) -> String + Send>>>,
}

impl std::fmt::Debug for MockChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChatProvider").field("name", &self.name).finish()
    }
}

impl MockChatProvider {
    /// Always returns the same response.
    pub fn constant(response: impl Into<String>) -> Self {
        Self {
            name: "mock-chat".to_string(),
            responses: vec![response.into()],
            index: AtomicUsize::new(0),
            responder: None,
        }
    }

    /// Cycles through a fixed list of canned responses.
    pub fn cycling(responses: Vec<String>) -> Self {
        Self {
            name: "mock-chat".to_string(),
            responses,
            index: AtomicUsize::new(0),
            responder: None,
        }
    }

    /// Computes a response from the prompt via a closure — useful for
    /// stubbing the edge verifier or intent synthesizer deterministically
    /// in tests.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(&str, &str) -> String + Send + 'static,
    {
        Self {
            name: "mock-chat-fn".to_string(),
            responses: Vec::new(),
            index: AtomicUsize::new(0),
            responder: Some(Mutex::new(Box::new(f))),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        _json_schema: Option<&serde_json::Value>,
    ) -> Result<String, ProviderError> {
        if let Some(responder) = &self.responder {
            let mut guard = responder
                .lock()
                .map_err(|_| ProviderError::Unavailable("mock responder poisoned".into()))?;
            return Ok(guard(system, user));
        }

        if self.responses.is_empty() {
            return Err(ProviderError::InvalidResponse("no canned responses configured".into()));
        }
        let i = self.index.fetch_add(1, Ordering::Relaxed) % self.responses.len();
        Ok(self.responses[i].clone())
    }
}
